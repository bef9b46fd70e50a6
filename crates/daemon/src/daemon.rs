// SPDX-License-Identifier: MIT

//! `Daemon`: wires every long-lived task together and exposes the
//! `spawn_agent` entry point the (out-of-scope) CLI and orchestrator-
//! internal lead-agent delegation call into.

use crate::config::Config;
use crate::error::DaemonError;
use crate::stores::Stores;
use crate::tasks;
use ov_adapters::RuntimeRegistry;
use ov_core::RunId;
use ov_core::{Capability, PermissionMode, RuntimeConfig as CoreRuntimeConfig};
use ov_health::{Watchdog, WatchdogConfig};
use ov_mail::MailBus;
use ov_merge::{Merger, MergerConfig, TierTwoConfig};
use ov_pane::PaneManager;
use ov_spawner::{AlwaysPresentTracker, SpawnError, SpawnOutcome, SpawnRequest, Spawner, SpawnerConfig};
use ov_worktree::WorktreeManager;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct Daemon {
    pub stores: Stores,
    pub mail: Arc<MailBus>,
    pub spawner: Spawner<ov_core::SystemClock>,
    merger: Arc<Merger>,
    watchdog: Arc<Watchdog>,
    config: Config,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Daemon {
    /// Open every store, construct every long-lived collaborator, and
    /// return a `Daemon` that hasn't started its background tasks yet —
    /// call [`Daemon::run`] for that.
    pub fn bootstrap(project_root: impl Into<PathBuf>, config: Config) -> Result<Self, DaemonError> {
        let project_root = project_root.into();
        let stores = Stores::open(&project_root)?;
        let mail = Arc::new(MailBus::new(stores.mail.clone()));
        let panes = Arc::new(PaneManager::new());
        let worktrees = Arc::new(WorktreeManager::new(&project_root));
        let registry = Arc::new(RuntimeRegistry::with_builtins());

        let runtime_config = CoreRuntimeConfig {
            id: config.runtime.default.clone(),
            default_model: if config.models.default_model.is_empty() { "default".to_string() } else { config.models.default_model.clone() },
            model_aliases: config.models.aliases.clone(),
            provider_env_vars: config.providers.env_vars.clone(),
            permission_mode_by_capability: default_permission_modes(),
        };

        let base_role_definitions = load_base_role_definitions(&project_root.join(".overstory").join("agent-defs"));

        let spawner_config = SpawnerConfig {
            stagger_window_ms: config.worktrees.stagger_window_ms,
            readiness_poll_interval: std::time::Duration::from_millis(config.worktrees.readiness_poll_interval_ms),
            readiness_timeout: std::time::Duration::from_millis(config.worktrees.readiness_timeout_ms),
            max_depth: config.agents.max_depth,
            default_max_sub_agents: config.agents.default_max_sub_agents,
            base_ref: config.project.canonical_branch.clone(),
        };

        let spawner = Spawner {
            config: spawner_config,
            clock: ov_core::SystemClock,
            tracker: Arc::new(AlwaysPresentTracker),
            sessions: stores.sessions.clone(),
            events: stores.events.clone(),
            worktrees,
            panes: panes.clone(),
            registry: registry.clone(),
            runtime_config,
            base_role_definitions,
        };

        let merger_adapter = if config.merge.tier_two_enabled { registry.get(&config.runtime.default).ok() } else { None };
        let merger = Arc::new(Merger::new(
            MergerConfig {
                project_root: project_root.clone(),
                canonical_branch: config.project.canonical_branch.clone(),
                tier_two: TierTwoConfig {
                    enabled: config.merge.tier_two_enabled,
                    model: config.merge.tier_two_model.clone(),
                    max_retries: config.merge.tier_two_max_retries,
                    timeout: std::time::Duration::from_millis(config.merge.tier_two_timeout_ms),
                },
                quality_gates: ov_core::OverlayConfig::default_quality_gates(),
            },
            stores.merge_queue.clone(),
            mail.clone(),
            merger_adapter,
        ));

        let watchdog = Arc::new(Watchdog::new(
            WatchdogConfig {
                tick_interval: std::time::Duration::from_millis(config.watchdog.tick_interval_ms),
                stale_ms: config.watchdog.stale_threshold_ms,
                zombie_ms: config.watchdog.zombie_threshold_ms,
            },
            stores.sessions.clone(),
            panes,
            mail.clone(),
        ));

        Ok(Self { stores, mail, spawner, merger, watchdog, config, cancel: CancellationToken::new(), tasks: Vec::new() })
    }

    /// Start the watchdog, merger-drain loop, and metrics-flush task as
    /// named tokio tasks sharing this daemon's cancellation token.
    pub fn run(&mut self) {
        self.tasks.push(tasks::spawn_watchdog(self.watchdog.clone(), self.cancel.clone()));
        self.tasks.push(tasks::spawn_merger_drain(self.merger.clone(), std::time::Duration::from_secs(5), self.cancel.clone()));
        self.tasks.push(tasks::spawn_metrics_flush(self.stores.sessions.clone(), self.stores.metrics.clone(), std::time::Duration::from_secs(30), self.cancel.clone()));
    }

    /// Thread a spawn request through `ov-spawner`. Used by the
    /// out-of-scope CLI and by orchestrator-internal lead-agent delegation.
    pub async fn spawn_agent(&self, request: SpawnRequest, run_id: Option<RunId>) -> Result<SpawnOutcome, SpawnError> {
        self.spawner.spawn(request, run_id).await
    }

    /// Signal every long-lived task to stop and wait for them to finish
    /// their current iteration (spec.md §5's cancellation contract).
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn default_permission_modes() -> HashMap<String, PermissionMode> {
    let mut modes = HashMap::new();
    for capability in [Capability::Scout, Capability::Reviewer, Capability::Monitor] {
        modes.insert(capability.as_str().to_string(), PermissionMode::Strict);
    }
    for capability in [Capability::Builder, Capability::Merger] {
        modes.insert(capability.as_str().to_string(), PermissionMode::BypassPermissions);
    }
    modes
}

fn load_base_role_definitions(dir: &Path) -> HashMap<String, String> {
    let mut definitions = HashMap::new();
    let Ok(entries) = std::fs::read_dir(dir) else { return definitions };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            if let (Some(stem), Ok(contents)) = (path.file_stem().and_then(|s| s.to_str()), std::fs::read_to_string(&path)) {
                definitions.insert(stem.to_string(), contents);
            }
        }
    }
    definitions
}
