// SPDX-License-Identifier: MIT

use std::time::Duration;

/// Tunables for the spawn pipeline (spec.md §4.6, §6's config surface).
#[derive(Debug, Clone)]
pub struct SpawnerConfig {
    /// Minimum gap, in milliseconds, enforced between two agent starts.
    pub stagger_window_ms: i64,
    /// How often to poll `capturePane` + `detectReady` while waiting for a
    /// freshly spawned agent to become ready.
    pub readiness_poll_interval: Duration,
    /// Upper bound on the readiness wait before the agent is marked `zombie`
    /// and torn down.
    pub readiness_timeout: Duration,
    /// Depth ceiling; a spawn requesting `depth` above this is rejected.
    pub max_depth: u32,
    /// Default sub-agent ceiling for a parent, when not overridden per-spawn.
    pub default_max_sub_agents: u32,
    /// The branch ref every new worktree is created from.
    pub base_ref: String,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            stagger_window_ms: 3_000,
            readiness_poll_interval: Duration::from_millis(500),
            readiness_timeout: Duration::from_secs(120),
            max_depth: 3,
            default_max_sub_agents: 4,
            base_ref: "HEAD".to_string(),
        }
    }
}
