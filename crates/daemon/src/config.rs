// SPDX-License-Identifier: MIT

//! Typed `config.yaml` structures (spec.md §6: "project, agents, worktrees,
//! mulch, merge, providers, watchdog ..., models, runtime, logging").
//! Defaults live on `Default` impls per section, not scattered literals, so
//! a config file only needs to name what it overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub canonical_branch: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { name: "overstory-project".to_string(), canonical_branch: "main".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    pub max_depth: u32,
    pub default_max_sub_agents: u32,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self { max_depth: 3, default_max_sub_agents: 4 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorktreeConfig {
    pub stagger_window_ms: i64,
    pub readiness_timeout_ms: u64,
    pub readiness_poll_interval_ms: u64,
}

impl Default for WorktreeConfig {
    fn default() -> Self {
        Self { stagger_window_ms: 3_000, readiness_timeout_ms: 120_000, readiness_poll_interval_ms: 500 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MulchConfig {
    /// Named pools of pre-loaded expertise text an overlay can draw from by domain.
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub tier_two_enabled: bool,
    pub tier_two_model: Option<String>,
    pub tier_two_max_retries: u32,
    pub tier_two_timeout_ms: u64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self { tier_two_enabled: false, tier_two_model: None, tier_two_max_retries: 1, tier_two_timeout_ms: 120_000 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Names of environment variables forwarded from the host process into
    /// spawned runtime processes (provider API keys).
    pub env_vars: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    pub tick_interval_ms: u64,
    pub stale_threshold_ms: i64,
    pub zombie_threshold_ms: i64,
    pub nudge_interval_ms: u64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self { tick_interval_ms: 10_000, stale_threshold_ms: 30_000, zombie_threshold_ms: 120_000, nudge_interval_ms: 60_000 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub default_model: String,
    pub aliases: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    pub default: String,
    pub per_agent_override: HashMap<String, String>,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self { default: "headless".to_string(), per_agent_override: HashMap::new() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), directory: "logs".to_string() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub agents: AgentsConfig,
    pub worktrees: WorktreeConfig,
    pub mulch: MulchConfig,
    pub merge: MergeConfig,
    pub providers: ProvidersConfig,
    pub watchdog: WatchdogConfig,
    pub models: ModelsConfig,
    pub runtime: RuntimeSection,
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse `config.yaml`. A missing file is not an error at this layer —
    /// callers that require a project to be initialized check for the
    /// file's existence themselves; `load` only parses bytes it's given.
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::parse(&yaml).map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config at {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("parsing config at {path}: {source}")]
    Parse { path: String, #[source] source: serde_yaml::Error },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_every_default() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.project.canonical_branch, "main");
        assert_eq!(config.watchdog.stale_threshold_ms, 30_000);
        assert_eq!(config.runtime.default, "headless");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let yaml = "watchdog:\n  stale_threshold_ms: 5000\n";
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.watchdog.stale_threshold_ms, 5_000);
        assert_eq!(config.watchdog.zombie_threshold_ms, 120_000);
    }
}
