use super::*;
use ov_core::MergeQueueEntry;
use ov_storage::MailStore;
use serial_test::serial;
use std::process::Command as StdCommand;
use tempfile::tempdir;

fn git(dir: &std::path::Path, args: &[&str]) {
    let status = StdCommand::new("git").arg("-C").arg(dir).args(args).status().unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

fn init_repo() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    git(dir.path(), &["init", "-q", "-b", "main"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    git(dir.path(), &["config", "user.name", "Test"]);
    std::fs::write(dir.path().join("README.md"), "root\n").unwrap();
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-q", "-m", "init"]);
    dir
}

fn head_sha(dir: &std::path::Path) -> String {
    let output = StdCommand::new("git").arg("-C").arg(dir).args(["rev-parse", "HEAD"]).output().unwrap();
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn harness(dir: &std::path::Path) -> (Merger, Arc<MergeQueueStore>) {
    let queue = Arc::new(MergeQueueStore::open(dir).unwrap());
    let mail = Arc::new(MailBus::new(Arc::new(MailStore::open(dir).unwrap())));
    let config = MergerConfig {
        project_root: dir.to_path_buf(),
        canonical_branch: "main".to_string(),
        tier_two: crate::config::TierTwoConfig::default(),
        quality_gates: vec![],
    };
    (Merger::new(config, queue.clone(), mail, None), queue)
}

#[tokio::test]
#[serial]
async fn fast_forward_merge_advances_canonical_head_and_marks_merged() {
    let dir = init_repo();
    let before = head_sha(dir.path());

    git(dir.path(), &["checkout", "-q", "-b", "overstory/builder-1/t1"]);
    std::fs::write(dir.path().join("feature.txt"), "z\n").unwrap();
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-q", "-m", "feature work"]);
    git(dir.path(), &["checkout", "-q", "main"]);

    let (merger, queue) = harness(dir.path());
    let id = queue.enqueue(MergeQueueEntry::new("overstory/builder-1/t1", "builder-1", chrono::Utc::now())).unwrap();
    merger.drain().await;

    let entry = queue.get(id).unwrap();
    assert_eq!(entry.status, MergeStatus::Merged);
    assert_ne!(head_sha(dir.path()), before);
}

#[tokio::test]
#[serial]
async fn conflicting_merge_leaves_canonical_branch_unchanged_and_marks_conflict() {
    let dir = init_repo();

    git(dir.path(), &["checkout", "-q", "-b", "overstory/builder-2/t2"]);
    std::fs::write(dir.path().join("README.md"), "branch change\n").unwrap();
    git(dir.path(), &["commit", "-aqm", "branch edits readme"]);
    git(dir.path(), &["checkout", "-q", "main"]);
    std::fs::write(dir.path().join("README.md"), "main change\n").unwrap();
    git(dir.path(), &["commit", "-aqm", "main edits readme"]);
    let before = head_sha(dir.path());

    let (merger, queue) = harness(dir.path());
    let id = queue.enqueue(MergeQueueEntry::new("overstory/builder-2/t2", "builder-2", chrono::Utc::now())).unwrap();
    merger.drain().await;

    let entry = queue.get(id).unwrap();
    assert_eq!(entry.status, MergeStatus::Conflict);
    assert!(entry.conflict_summary.is_some());
    assert_eq!(head_sha(dir.path()), before);
}
