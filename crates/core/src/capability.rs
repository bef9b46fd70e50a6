// SPDX-License-Identifier: MIT

//! The role an agent plays.

use serde::{Deserialize, Serialize};

/// Closed set of roles an agent can be spawned with, plus an escape hatch
/// for operator-defined roles that still need classification as
/// read-only-vs-writable for the guard layer and overlay generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Scout,
    Builder,
    Reviewer,
    Lead,
    Merger,
    Coordinator,
    Supervisor,
    Monitor,
    Custom(String),
}

impl Capability {
    /// Parse a capability name, falling back to `Custom` for anything
    /// outside the closed set.
    pub fn parse(name: &str) -> Self {
        match name {
            "scout" => Capability::Scout,
            "builder" => Capability::Builder,
            "reviewer" => Capability::Reviewer,
            "lead" => Capability::Lead,
            "merger" => Capability::Merger,
            "coordinator" => Capability::Coordinator,
            "supervisor" => Capability::Supervisor,
            "monitor" => Capability::Monitor,
            other => Capability::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Capability::Scout => "scout",
            Capability::Builder => "builder",
            Capability::Reviewer => "reviewer",
            Capability::Lead => "lead",
            Capability::Merger => "merger",
            Capability::Coordinator => "coordinator",
            Capability::Supervisor => "supervisor",
            Capability::Monitor => "monitor",
            Capability::Custom(name) => name.as_str(),
        }
    }

    /// True for capabilities that are permitted to modify files in their
    /// worktree (spec.md §4.2 guard rule 3: file-modifying tools are
    /// blocked for every capability except these).
    pub fn is_write_capable(&self) -> bool {
        matches!(self, Capability::Builder | Capability::Merger | Capability::Custom(_))
    }

    /// Narrow git add/commit exceptions for metadata sync (guard rule 7).
    pub fn has_coordination_git_exception(&self) -> bool {
        matches!(self, Capability::Coordinator | Capability::Lead | Capability::Supervisor)
    }

    /// Whether this capability is permitted to spawn sub-agents by default.
    /// Overridable per-spawn by an explicit `can_spawn` flag in `OverlayConfig`.
    pub fn can_spawn_by_default(&self) -> bool {
        matches!(self, Capability::Lead | Capability::Coordinator | Capability::Supervisor)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "capability_tests.rs"]
mod tests;
