use super::*;
use serial_test::serial;
use std::collections::HashMap;
use tempfile::tempdir;

fn kill_if_present(name: &str) {
    let _ = std::process::Command::new("tmux").args(["kill-session", "-t", name]).status();
}

#[tokio::test]
#[serial]
async fn create_send_capture_kill_round_trip() {
    let name = "ov-pane-test-roundtrip";
    kill_if_present(name);
    let manager = PaneManager::new();
    let dir = tempdir().unwrap();

    manager.create_session(name, dir.path(), &HashMap::new(), "sh").await.unwrap();
    manager.send_keys(name, "echo hello-from-pane").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    let captured = manager.capture_pane(name).await.unwrap();
    assert!(captured.contains("hello-from-pane"), "captured: {captured}");

    manager.kill_session(name).await.unwrap();
    let err = manager.capture_pane(name).await.unwrap_err();
    assert!(matches!(err, SessionError::NotFound { .. }));
}

#[tokio::test]
#[serial]
async fn create_refuses_duplicate_session_name() {
    let name = "ov-pane-test-duplicate";
    kill_if_present(name);
    let manager = PaneManager::new();
    let dir = tempdir().unwrap();

    manager.create_session(name, dir.path(), &HashMap::new(), "sh").await.unwrap();
    let err = manager.create_session(name, dir.path(), &HashMap::new(), "sh").await.unwrap_err();
    assert!(matches!(err, SessionError::OperationFailed { .. }));

    manager.kill_session(name).await.unwrap();
}

#[tokio::test]
#[serial]
async fn list_sessions_includes_created_session() {
    let name = "ov-pane-test-list";
    kill_if_present(name);
    let manager = PaneManager::new();
    let dir = tempdir().unwrap();

    manager.create_session(name, dir.path(), &HashMap::new(), "sh").await.unwrap();
    let sessions = manager.list_sessions().await.unwrap();
    assert!(sessions.iter().any(|s| s == name));

    manager.kill_session(name).await.unwrap();
}

#[tokio::test]
#[serial]
async fn send_keys_passes_env_into_session() {
    let name = "ov-pane-test-env";
    kill_if_present(name);
    let manager = PaneManager::new();
    let dir = tempdir().unwrap();
    let mut env = HashMap::new();
    env.insert("OV_TEST_VAR".to_string(), "pane-value".to_string());

    manager.create_session(name, dir.path(), &env, "sh").await.unwrap();
    manager.send_keys(name, "echo $OV_TEST_VAR").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    let captured = manager.capture_pane(name).await.unwrap();
    assert!(captured.contains("pane-value"), "captured: {captured}");

    manager.kill_session(name).await.unwrap();
}

#[tokio::test]
async fn session_name_matches_naming_convention() {
    assert_eq!(super::super::session_name("builder-abc1"), "overstory-builder-abc1");
}
