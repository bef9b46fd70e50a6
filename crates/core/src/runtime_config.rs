// SPDX-License-Identifier: MIT

//! `RuntimeConfig`: per-runtime-adapter configuration.

use crate::capability::Capability;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Permission mode passed to a runtime's spawn command, controlling how
/// aggressively it asks for human confirmation before acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// Never ask; guard hooks are the only enforcement layer.
    BypassPermissions,
    /// Ask before anything outside an explicit allowlist.
    Default,
    /// Ask before every tool call.
    Strict,
}

/// A named configuration for one runtime adapter (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Stable adapter id, matches `RuntimeAdapter::id()`.
    pub id: String,
    pub default_model: String,
    /// Maps a logical model alias (e.g. "fast", "careful") to a concrete model name.
    pub model_aliases: HashMap<String, String>,
    /// Names of environment variables the adapter forwards from the host
    /// process (provider API keys, etc).
    pub provider_env_vars: Vec<String>,
    pub permission_mode_by_capability: HashMap<String, PermissionMode>,
}

impl RuntimeConfig {
    /// Resolve the capability-to-model alias, falling back to `default_model`.
    pub fn resolve_model(&self, alias: Option<&str>) -> String {
        match alias {
            Some(alias) => self.model_aliases.get(alias).cloned().unwrap_or_else(|| self.default_model.clone()),
            None => self.default_model.clone(),
        }
    }

    pub fn permission_mode(&self, capability: &Capability) -> PermissionMode {
        self.permission_mode_by_capability
            .get(capability.as_str())
            .copied()
            .unwrap_or(PermissionMode::Default)
    }
}
