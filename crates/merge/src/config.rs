// SPDX-License-Identifier: MIT

//! Merger configuration, including the Open Question resolution recorded in
//! DESIGN.md: tier 2 gets exactly one retry before demotion to tier 3.

use ov_core::QualityGate;
use std::path::PathBuf;

/// Tier 2 (AI-assisted conflict resolution) configuration. Disabled by
/// default — enabling it lets the merger invoke the runtime's one-shot
/// print command against the conflict context.
#[derive(Debug, Clone)]
pub struct TierTwoConfig {
    pub enabled: bool,
    /// Model override for the print-command invocation; `None` uses the
    /// runtime's default model.
    pub model: Option<String>,
    /// Bounded retry policy for the Open Question in spec.md §9: if the
    /// tier-2 patch itself conflicts (or fails quality gates), retry at
    /// most this many times before demoting to tier 3. Default: 1.
    pub max_retries: u32,
    /// Bounded wall-clock budget for a single print-command invocation.
    pub timeout: std::time::Duration,
}

impl Default for TierTwoConfig {
    fn default() -> Self {
        Self { enabled: false, model: None, max_retries: 1, timeout: std::time::Duration::from_secs(120) }
    }
}

#[derive(Debug, Clone)]
pub struct MergerConfig {
    /// The canonical project root — the single worktree where the
    /// canonical branch is always checked out (spec.md §5: "the canonical
    /// root is read-only to everything except the merger").
    pub project_root: PathBuf,
    pub canonical_branch: String,
    pub tier_two: TierTwoConfig,
    /// Gates a tier-2 patch must pass before it's accepted (spec.md §4.10:
    /// "apply the returned patch only when it passes the same quality
    /// gates").
    pub quality_gates: Vec<QualityGate>,
}
