// SPDX-License-Identifier: MIT

use ov_core::Capability;

/// Inputs to one spawn (spec.md §4.6).
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub task_id: String,
    pub capability: Capability,
    pub agent_name_override: Option<String>,
    pub spec_path: Option<String>,
    pub file_scope: Vec<String>,
    pub expertise_domains: Vec<String>,
    pub preloaded_expertise: Option<String>,
    pub parent_agent: Option<String>,
    pub depth: u32,
    pub skip_scout: bool,
    pub skip_review: bool,
    pub max_sub_agents_override: Option<u32>,
    pub skip_task_check: bool,
    pub force_hierarchy: bool,
    pub runtime_override: Option<String>,
}

impl SpawnRequest {
    /// Derive the agent name from the task id and capability when no
    /// override was given, matching the `<capability>-<task-suffix>`
    /// convention (e.g. task `ov-abc1` + capability `builder` → `builder-abc1`).
    pub fn resolve_agent_name(&self) -> String {
        if let Some(name) = &self.agent_name_override {
            return name.clone();
        }
        let suffix = self.task_id.strip_prefix("ov-").unwrap_or(&self.task_id);
        format!("{}-{}", self.capability.as_str(), suffix)
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
