// SPDX-License-Identifier: MIT

//! `OverlayConfig`: in-memory inputs to the overlay generator (ov-overlay).

use crate::capability::Capability;
use serde::{Deserialize, Serialize};

/// A single quality gate: a named check with its command and a human
/// description, used to render all four overlay presentation forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityGate {
    pub name: String,
    pub command: String,
    pub description: String,
}

/// Dispatch overrides that tweak a single spawn's behavior without changing
/// the capability's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOverrides {
    pub skip_review: bool,
    pub max_sub_agents: Option<u32>,
}

/// The full set of inputs to the overlay generator (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub agent_name: String,
    pub task_id: String,
    pub capability: Capability,
    pub spec_path: Option<String>,
    pub branch_name: String,
    pub worktree_path: String,
    pub parent_agent: Option<String>,
    pub depth: u32,
    /// Ordered sequence of file-scope globs/paths; may be empty.
    pub file_scope: Vec<String>,
    pub expertise_domains: Vec<String>,
    pub preloaded_expertise: Option<String>,
    pub can_spawn: bool,
    pub quality_gates: Vec<QualityGate>,
    pub skip_scout: bool,
    pub dispatch_overrides: Option<DispatchOverrides>,
    /// The capability's base role definition text (from `agent-defs/*.md`).
    pub base_role_definition: String,
}

impl OverlayConfig {
    pub fn default_quality_gates() -> Vec<QualityGate> {
        vec![
            QualityGate {
                name: "format".to_string(),
                command: "cargo fmt --check".to_string(),
                description: "Code is formatted".to_string(),
            },
            QualityGate {
                name: "lint".to_string(),
                command: "cargo clippy --all-targets -- -D warnings".to_string(),
                description: "No lint warnings".to_string(),
            },
            QualityGate {
                name: "test".to_string(),
                command: "cargo test".to_string(),
                description: "Tests pass".to_string(),
            },
        ]
    }
}
