use super::*;
use crate::config::SpawnerConfig;
use crate::task_tracker::{AlwaysPresentTracker, TaskTracker};
use async_trait::async_trait;
use ov_adapters::RuntimeRegistry;
use ov_core::{Capability, FakeClock, RuntimeConfig};
use ov_pane::PaneManager;
use ov_storage::{EventStore, SessionStore};
use ov_worktree::WorktreeManager;
use std::collections::HashMap;
use tempfile::TempDir;

struct NeverPresentTracker;

#[async_trait]
impl TaskTracker for NeverPresentTracker {
    async fn exists(&self, _task_id: &str) -> bool {
        false
    }
}

fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        id: "headless".to_string(),
        default_model: "default-model".to_string(),
        model_aliases: HashMap::new(),
        provider_env_vars: Vec::new(),
        permission_mode_by_capability: HashMap::new(),
    }
}

fn make_spawner(dir: &TempDir, tracker: Arc<dyn TaskTracker>) -> Spawner<FakeClock> {
    Spawner {
        config: SpawnerConfig::default(),
        clock: FakeClock::new(),
        tracker,
        sessions: Arc::new(SessionStore::open(dir.path()).unwrap()),
        events: Arc::new(EventStore::open(dir.path()).unwrap()),
        worktrees: Arc::new(WorktreeManager::new(dir.path())),
        panes: Arc::new(PaneManager::new()),
        registry: Arc::new(RuntimeRegistry::with_builtins()),
        runtime_config: runtime_config(),
        base_role_definitions: HashMap::new(),
    }
}

fn base_request() -> SpawnRequest {
    SpawnRequest {
        task_id: "ov-abc1".to_string(),
        capability: Capability::Builder,
        agent_name_override: None,
        spec_path: None,
        file_scope: Vec::new(),
        expertise_domains: Vec::new(),
        preloaded_expertise: None,
        parent_agent: None,
        depth: 0,
        skip_scout: false,
        skip_review: false,
        max_sub_agents_override: None,
        skip_task_check: false,
        force_hierarchy: false,
        runtime_override: None,
    }
}

#[tokio::test]
async fn missing_task_is_rejected_before_any_side_effects() {
    let dir = TempDir::new().unwrap();
    let spawner = make_spawner(&dir, Arc::new(NeverPresentTracker));
    let err = spawner.spawn(base_request(), None).await.unwrap_err();
    assert!(matches!(err, SpawnError::Agent(AgentError::Generic { .. })));
}

#[tokio::test]
async fn depth_beyond_max_is_rejected() {
    let dir = TempDir::new().unwrap();
    let spawner = make_spawner(&dir, Arc::new(AlwaysPresentTracker));
    let mut request = base_request();
    request.depth = spawner.config.max_depth + 1;
    let err = spawner.spawn(request, None).await.unwrap_err();
    assert!(matches!(err, SpawnError::Agent(AgentError::DepthExceeded { .. })));
}

#[tokio::test]
async fn missing_parent_is_rejected() {
    let dir = TempDir::new().unwrap();
    let spawner = make_spawner(&dir, Arc::new(AlwaysPresentTracker));
    let mut request = base_request();
    request.parent_agent = Some("ghost-parent".to_string());
    let err = spawner.spawn(request, None).await.unwrap_err();
    assert!(matches!(err, SpawnError::Agent(AgentError::Generic { .. })));
}

#[tokio::test]
async fn parent_without_spawn_capability_is_rejected() {
    let dir = TempDir::new().unwrap();
    let spawner = make_spawner(&dir, Arc::new(AlwaysPresentTracker));
    let parent = ov_core::AgentSession::new("builder-parent", "ov-parent", Capability::Builder, "/tmp/wt-parent", "pane-parent", 0, None, "headless", spawner.clock.now());
    spawner.sessions.register(parent).unwrap();

    let mut request = base_request();
    request.parent_agent = Some("builder-parent".to_string());
    let err = spawner.spawn(request, None).await.unwrap_err();
    assert!(matches!(err, SpawnError::Agent(AgentError::ParentCannotSpawn { .. })));
}

#[tokio::test]
async fn parent_at_sub_agent_ceiling_is_rejected() {
    let dir = TempDir::new().unwrap();
    let spawner = make_spawner(&dir, Arc::new(AlwaysPresentTracker));
    let now = spawner.clock.now();
    let parent = ov_core::AgentSession::new("lead-parent", "ov-parent", Capability::Lead, "/tmp/wt-parent", "pane-parent", 0, None, "headless", now);
    spawner.sessions.register(parent).unwrap();

    let mut request = base_request();
    request.parent_agent = Some("lead-parent".to_string());
    request.max_sub_agents_override = Some(1);

    for i in 0..1 {
        let mut child = ov_core::AgentSession::new(format!("builder-child{i}"), "ov-child", Capability::Builder, "/tmp/wt-child", "pane-child", 1, None, "headless", now);
        child.parent_agent = Some("lead-parent".to_string());
        spawner.sessions.register(child).unwrap();
    }

    let err = spawner.spawn(request, None).await.unwrap_err();
    assert!(matches!(err, SpawnError::Agent(AgentError::SubAgentCeiling { .. })));
}

#[tokio::test]
async fn force_hierarchy_skips_parent_validation_and_fails_later_at_worktree_step() {
    let dir = TempDir::new().unwrap();
    let spawner = make_spawner(&dir, Arc::new(AlwaysPresentTracker));
    let mut request = base_request();
    request.parent_agent = Some("ghost-parent".to_string());
    request.force_hierarchy = true;

    let err = spawner.spawn(request, None).await.unwrap_err();
    assert!(matches!(err, SpawnError::Worktree(ov_core::WorktreeError::NotAGitRepository { .. })));
}

#[tokio::test]
async fn failed_spawn_leaves_no_session_row_registered() {
    let dir = TempDir::new().unwrap();
    let spawner = make_spawner(&dir, Arc::new(AlwaysPresentTracker));
    let request = base_request();
    let _ = spawner.spawn(request, None).await;
    assert!(spawner.sessions.get_all().is_empty());
}
