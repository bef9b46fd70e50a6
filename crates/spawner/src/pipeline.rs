// SPDX-License-Identifier: MIT

//! The end-to-end spawn pipeline (spec.md §4.6). Deterministic steps with
//! compensating rollback on any failure after the worktree is created.

use crate::config::SpawnerConfig;
use crate::error::SpawnError;
use crate::request::SpawnRequest;
use crate::task_tracker::TaskTracker;
use ov_adapters::{AppendSystemPrompt, HooksDef, ReadyState, RuntimeAdapter, RuntimeRegistry, SpawnCommandOptions};
use ov_core::{
    branch_name, AgentError, AgentSession, Clock, EventLevel, EventType, OverlayConfig, RunId, RuntimeConfig, SessionState, StoredEvent,
};
use ov_overlay::render as render_overlay;
use ov_pane::PaneManager;
use ov_storage::{EventStore, SessionStore};
use ov_worktree::WorktreeManager;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

const BEACON_MESSAGE: &str = "Read your overlay file and begin.";

/// Collaborators the pipeline drives. Held behind `Arc` so a daemon can
/// share one instance across concurrently-requested spawns. Generic over
/// `Clock` (rather than a trait object) since `Clock: Clone` isn't
/// object-safe.
pub struct Spawner<C: Clock> {
    pub config: SpawnerConfig,
    pub clock: C,
    pub tracker: Arc<dyn TaskTracker>,
    pub sessions: Arc<SessionStore>,
    pub events: Arc<EventStore>,
    pub worktrees: Arc<WorktreeManager>,
    pub panes: Arc<PaneManager>,
    pub registry: Arc<RuntimeRegistry>,
    pub runtime_config: RuntimeConfig,
    /// Base role definition text per capability, from `agent-defs/*.md`.
    pub base_role_definitions: HashMap<String, String>,
}

/// What the pipeline produced for a successful spawn.
#[derive(Debug, Clone)]
pub struct SpawnOutcome {
    pub agent_name: String,
    pub branch_name: String,
    pub worktree_path: PathBuf,
    pub pane_id: String,
}

/// Tracks what a spawn attempt has created so a failure can be unwound in
/// reverse order (spec.md §4.6: "each step records what it created").
#[derive(Default)]
struct Progress {
    worktree: Option<(String, PathBuf, String)>, // agent_name, path, branch
    pane: Option<String>,
    registered: bool,
}

impl<C: Clock> Spawner<C> {
    pub async fn spawn(&self, request: SpawnRequest, run_id: Option<RunId>) -> Result<SpawnOutcome, SpawnError> {
        let mut progress = Progress::default();
        match self.spawn_inner(&request, run_id, &mut progress).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.rollback(&progress).await;
                Err(err)
            }
        }
    }

    async fn spawn_inner(&self, request: &SpawnRequest, run_id: Option<RunId>, progress: &mut Progress) -> Result<SpawnOutcome, SpawnError> {
        let agent_name = request.resolve_agent_name();

        // Step 1: validate.
        if !request.skip_task_check && !self.tracker.exists(&request.task_id).await {
            return Err(AgentError::Generic { agent_name: agent_name.clone(), message: format!("task {} not found", request.task_id) }.into());
        }
        if request.depth > self.config.max_depth {
            return Err(AgentError::DepthExceeded { agent_name: agent_name.clone(), depth: request.depth, max_depth: self.config.max_depth }.into());
        }
        if let Some(parent) = &request.parent_agent {
            if !request.force_hierarchy {
                self.validate_hierarchy(&agent_name, parent, request.max_sub_agents_override)?;
            }
        }

        // Step 2: stagger delay.
        let now = self.clock.now();
        let most_recent = self.sessions.get_all().into_iter().map(|s| s.started_at).max();
        let delay_ms = crate::stagger::stagger_delay_ms(self.config.stagger_window_ms, most_recent, now);
        if delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms as u64)).await;
        }

        // Step 3: resolve runtime & model.
        let runtime_id = request.runtime_override.clone().unwrap_or_else(|| self.runtime_config.id.clone());
        let adapter = self.registry.get(&runtime_id)?;
        let model = self.runtime_config.resolve_model(Some(request.capability.as_str()));
        let permission_mode = self.runtime_config.permission_mode(&request.capability);

        // Step 4: create worktree.
        let branch = branch_name(&agent_name, &request.task_id);
        let worktree_path = self.worktrees.create(&agent_name, &branch, &self.config.base_ref).await?;
        progress.worktree = Some((agent_name.clone(), worktree_path.clone(), branch.clone()));

        // Step 5: generate overlay, deploy via runtime adapter (also installs guards).
        let quality_gates = OverlayConfig::default_quality_gates();
        let dispatch_overrides = if request.skip_review || request.max_sub_agents_override.is_some() {
            Some(ov_core::DispatchOverrides { skip_review: request.skip_review, max_sub_agents: request.max_sub_agents_override })
        } else {
            None
        };
        let overlay_config = OverlayConfig {
            agent_name: agent_name.clone(),
            task_id: request.task_id.clone(),
            capability: request.capability.clone(),
            spec_path: request.spec_path.clone(),
            branch_name: branch.clone(),
            worktree_path: worktree_path.display().to_string(),
            parent_agent: request.parent_agent.clone(),
            depth: request.depth,
            file_scope: request.file_scope.clone(),
            expertise_domains: request.expertise_domains.clone(),
            preloaded_expertise: request.preloaded_expertise.clone(),
            can_spawn: request.capability.can_spawn_by_default(),
            quality_gates: quality_gates.clone(),
            skip_scout: request.skip_scout,
            dispatch_overrides,
            base_role_definition: self.base_role_definition(&request.capability),
        };
        let overlay_body = render_overlay(&overlay_config);
        let hooks = HooksDef {
            agent_name: agent_name.clone(),
            capability: request.capability.clone(),
            worktree_path: worktree_path.display().to_string(),
            quality_gate_commands: quality_gates.iter().map(|g| g.command.clone()).collect(),
        };
        adapter.deploy_config(&worktree_path, Some(&overlay_body), &hooks).await?;

        // Step 6: build the spawn command.
        let mut env = adapter.build_env(&model);
        env.insert("OVERSTORY_AGENT_NAME".to_string(), agent_name.clone());
        env.insert("OVERSTORY_TASK_ID".to_string(), request.task_id.clone());
        env.insert("OVERSTORY_CAPABILITY".to_string(), request.capability.as_str().to_string());
        for var in &self.runtime_config.provider_env_vars {
            if let Ok(value) = std::env::var(var) {
                env.insert(var.clone(), value);
            }
        }
        let spawn_opts = SpawnCommandOptions {
            model: model.clone(),
            permission_mode,
            cwd: worktree_path.clone(),
            env: env.clone(),
            append_system_prompt: Some(AppendSystemPrompt::Path(worktree_path.join(adapter.instruction_path()))),
        };
        let command = adapter.build_spawn_command(&spawn_opts);

        // Step 7: create the pane.
        let pane_id = ov_pane::session_name(&agent_name);
        self.panes.create_session(&pane_id, &worktree_path, &env, &command).await?;
        progress.pane = Some(pane_id.clone());

        // Step 8: register the session.
        let session = AgentSession {
            parent_agent: request.parent_agent.clone(),
            ..AgentSession::new(agent_name.clone(), request.task_id.clone(), request.capability.clone(), worktree_path.display().to_string(), pane_id.clone(), request.depth, run_id, adapter.id(), now)
        };
        self.sessions.register(session)?;
        progress.registered = true;

        // Step 9: wait for readiness.
        self.wait_for_ready(&adapter, &agent_name, &pane_id).await.map_err(|err| {
            let _ = self.sessions.set_state(&agent_name, SessionState::Zombie);
            err
        })?;
        self.sessions.set_state(&agent_name, SessionState::Working)?;

        // Step 10: beacon.
        self.panes.send_keys(&pane_id, BEACON_MESSAGE).await?;
        if adapter.requires_beacon_verification() {
            tokio::time::sleep(self.config.readiness_poll_interval).await;
            let snapshot = self.panes.capture_pane(&pane_id).await?;
            if !matches!(adapter.detect_ready(&snapshot), ReadyState::Ready) {
                self.panes.send_keys(&pane_id, BEACON_MESSAGE).await?;
            }
        }

        // Step 11: emit spawn event.
        self.events.append(StoredEvent::pending(
            agent_name.clone(),
            EventType::Spawn,
            EventLevel::Info,
            run_id,
            now,
            serde_json::json!({ "task_id": request.task_id, "capability": request.capability.as_str(), "runtime": adapter.id() }),
        ))?;

        Ok(SpawnOutcome { agent_name, branch_name: branch, worktree_path, pane_id })
    }

    fn validate_hierarchy(&self, agent_name: &str, parent: &str, max_sub_agents_override: Option<u32>) -> Result<(), SpawnError> {
        let parent_session = self
            .sessions
            .get(parent)
            .ok_or_else(|| AgentError::Generic { agent_name: agent_name.to_string(), message: format!("parent {parent} not found") })?;
        if !parent_session.capability.can_spawn_by_default() {
            return Err(AgentError::ParentCannotSpawn { agent_name: agent_name.to_string(), parent: parent.to_string() }.into());
        }
        let ceiling = max_sub_agents_override.unwrap_or(self.config.default_max_sub_agents);
        if self.sessions.children_of(parent).len() as u32 >= ceiling {
            return Err(AgentError::SubAgentCeiling { agent_name: agent_name.to_string(), parent: parent.to_string() }.into());
        }
        Ok(())
    }

    async fn wait_for_ready(&self, adapter: &Arc<dyn RuntimeAdapter>, agent_name: &str, pane_id: &str) -> Result<(), SpawnError> {
        let deadline = tokio::time::Instant::now() + self.config.readiness_timeout;
        loop {
            let snapshot = self.panes.capture_pane(pane_id).await?;
            match adapter.detect_ready(&snapshot) {
                ReadyState::Ready => return Ok(()),
                ReadyState::Dialog(action) => {
                    self.panes.send_keys(pane_id, &action).await?;
                }
                ReadyState::Loading => {}
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(AgentError::ReadinessTimeout { agent_name: agent_name.to_string(), timeout_ms: self.config.readiness_timeout.as_millis() as u64 }.into());
            }
            tokio::time::sleep(self.config.readiness_poll_interval).await;
        }
    }

    fn base_role_definition(&self, capability: &ov_core::Capability) -> String {
        self.base_role_definitions
            .get(capability.as_str())
            .cloned()
            .unwrap_or_else(|| format!("You are a {capability} agent for Overstory."))
    }

    async fn rollback(&self, progress: &Progress) {
        if let Some(pane_id) = &progress.pane {
            if let Err(err) = self.panes.kill_session(pane_id).await {
                tracing::warn!(pane_id = %pane_id, error = %err, "rollback: failed to kill pane");
            }
        }
        if progress.registered {
            if let Some((agent_name, _, _)) = &progress.worktree {
                if let Err(err) = self.sessions.remove(agent_name) {
                    tracing::warn!(agent_name = %agent_name, error = %err, "rollback: failed to remove session row");
                }
            }
        }
        if let Some((agent_name, path, branch)) = &progress.worktree {
            if let Err(err) = self.worktrees.remove(agent_name, path, branch).await {
                tracing::warn!(agent_name = %agent_name, error = %err, "rollback: failed to remove worktree");
            }
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
