use super::*;
use serial_test::serial;
use std::process::Command as StdCommand;
use tempfile::tempdir;

fn init_repo(dir: &Path) {
    let run = |args: &[&str]| {
        let status = StdCommand::new("git").current_dir(dir).args(args).status().expect("git available");
        assert!(status.success(), "git {:?} failed", args);
    };
    run(&["init", "-q"]);
    run(&["config", "user.email", "test@example.com"]);
    run(&["config", "user.name", "Test"]);
    std::fs::write(dir.join("README.md"), "hello\n").unwrap();
    run(&["add", "."]);
    run(&["commit", "-q", "-m", "initial"]);
}

#[tokio::test]
#[serial]
async fn create_checks_out_new_branch_under_worktrees_dir() {
    let dir = tempdir().unwrap();
    init_repo(dir.path());
    let manager = WorktreeManager::new(dir.path());

    let path = manager.create("builder-abc1", "overstory/builder-abc1/ov-abc1", "HEAD").await.unwrap();
    assert_eq!(path, dir.path().join(".overstory/worktrees/builder-abc1"));
    assert!(path.join("README.md").exists());
}

#[tokio::test]
#[serial]
async fn create_refuses_existing_worktree_path() {
    let dir = tempdir().unwrap();
    init_repo(dir.path());
    let manager = WorktreeManager::new(dir.path());
    manager.create("builder-abc1", "overstory/builder-abc1/ov-abc1", "HEAD").await.unwrap();

    let err = manager.create("builder-abc1", "overstory/builder-abc1/ov-abc2", "HEAD").await.unwrap_err();
    assert!(matches!(err, WorktreeError::AlreadyExists { .. }));
}

#[tokio::test]
#[serial]
async fn create_refuses_when_not_a_git_repository() {
    let dir = tempdir().unwrap();
    let manager = WorktreeManager::new(dir.path());
    let err = manager.create("scout-x1", "overstory/scout-x1/ov-x1", "HEAD").await.unwrap_err();
    assert!(matches!(err, WorktreeError::NotAGitRepository { .. }));
}

#[tokio::test]
#[serial]
async fn remove_tears_down_worktree_and_branch() {
    let dir = tempdir().unwrap();
    init_repo(dir.path());
    let manager = WorktreeManager::new(dir.path());
    let path = manager.create("builder-abc1", "overstory/builder-abc1/ov-abc1", "HEAD").await.unwrap();

    manager.remove("builder-abc1", &path, "overstory/builder-abc1/ov-abc1").await.unwrap();
    assert!(!path.exists());
}

#[tokio::test]
#[serial]
async fn refuses_to_operate_on_canonical_root() {
    let dir = tempdir().unwrap();
    init_repo(dir.path());
    let manager = WorktreeManager::new(dir.path());
    let err = manager.remove("whoever", dir.path(), "whatever").await.unwrap_err();
    assert!(matches!(err, WorktreeError::CanonicalRoot { .. }));
}

#[tokio::test]
#[serial]
async fn list_includes_created_worktree() {
    let dir = tempdir().unwrap();
    init_repo(dir.path());
    let manager = WorktreeManager::new(dir.path());
    let path = manager.create("builder-abc1", "overstory/builder-abc1/ov-abc1", "HEAD").await.unwrap();

    let worktrees = manager.list().await.unwrap();
    let canonical_path = std::fs::canonicalize(&path).unwrap();
    assert!(worktrees.iter().any(|w| std::fs::canonicalize(w).map(|c| c == canonical_path).unwrap_or(false)));
}
