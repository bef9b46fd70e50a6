use super::*;
use crate::guards::HooksDef;
use ov_core::Capability;

#[test]
fn detect_ready_matches_prompt_marker() {
    assert_eq!(Hybrid.detect_ready(">>> "), ReadyState::Ready);
    assert_eq!(Hybrid.detect_ready("Continue?"), ReadyState::Dialog("y".to_string()));
    assert_eq!(Hybrid.detect_ready("still booting"), ReadyState::Loading);
}

#[tokio::test]
async fn deploy_config_writes_extension_source() {
    let dir = tempfile::tempdir().unwrap();
    let hooks = HooksDef {
        agent_name: "reviewer-q1".to_string(),
        capability: Capability::Reviewer,
        worktree_path: dir.path().display().to_string(),
        quality_gate_commands: vec![],
    };
    Hybrid.deploy_config(dir.path(), Some("# overlay"), &hooks).await.unwrap();
    let guard = tokio::fs::read_to_string(dir.path().join(".overstory/guard")).await.unwrap();
    assert!(guard.contains("reviewer-q1"));
    let overlay = tokio::fs::read_to_string(dir.path().join(".hybrid/AGENTS.md")).await.unwrap();
    assert_eq!(overlay, "# overlay");
}
