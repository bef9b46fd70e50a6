// SPDX-License-Identifier: MIT

//! `WorktreeManager`: create/destroy git worktrees on dedicated per-agent
//! branches (spec.md §4.3). Shells out to the `git` binary — never a git
//! library — so behavior always matches whatever `git` the host has
//! installed, matching the teacher's own pattern for version-control
//! operations.

use crate::subprocess::{run_with_timeout, GIT_TIMEOUT};
use ov_core::WorktreeError;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Directory (relative to the project root) every agent worktree lives
/// under, per the persisted-state layout in spec.md §6.
pub const WORKTREES_SUBDIR: &str = ".overstory/worktrees";

pub struct WorktreeManager {
    /// The canonical project root. Every worktree path is validated never to
    /// resolve to this path.
    project_root: PathBuf,
}

impl WorktreeManager {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self { project_root: project_root.into() }
    }

    fn worktree_path(&self, agent_name: &str) -> PathBuf {
        self.project_root.join(WORKTREES_SUBDIR).join(agent_name)
    }

    /// Create a new worktree for `agent_name` on `branch`, rooted from
    /// `base_ref` (the canonical branch tip).
    pub async fn create(&self, agent_name: &str, branch: &str, base_ref: &str) -> Result<PathBuf, WorktreeError> {
        let path = self.worktree_path(agent_name);
        self.refuse_canonical_root(&path)?;

        if path.exists() {
            return Err(WorktreeError::AlreadyExists { path: path.display().to_string() });
        }

        if !self.project_root.join(".git").exists() {
            return Err(WorktreeError::NotAGitRepository { path: self.project_root.display().to_string() });
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WorktreeError::GitFailed { agent_name: agent_name.to_string(), operation: "mkdir".to_string(), stderr: e.to_string() })?;
        }

        let mut cmd = Command::new("git");
        cmd.args(["-C", &self.project_root.display().to_string(), "worktree", "add", "-b", branch, &path.display().to_string(), base_ref]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git worktree add").await.map_err(|_| WorktreeError::GitFailed {
            agent_name: agent_name.to_string(),
            operation: "worktree add".to_string(),
            stderr: "timed out".to_string(),
        })?;

        if !output.status.success() {
            return Err(WorktreeError::GitFailed {
                agent_name: agent_name.to_string(),
                operation: "worktree add".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(path)
    }

    /// Tear down the worktree at `path` and delete its branch. Best-effort
    /// on the branch delete; the worktree removal itself is surfaced as an
    /// error.
    pub async fn remove(&self, agent_name: &str, path: &Path, branch: &str) -> Result<(), WorktreeError> {
        self.refuse_canonical_root(path)?;

        let mut cmd = Command::new("git");
        cmd.args(["-C", &self.project_root.display().to_string(), "worktree", "remove", "--force", &path.display().to_string()]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git worktree remove").await.map_err(|_| WorktreeError::GitFailed {
            agent_name: agent_name.to_string(),
            operation: "worktree remove".to_string(),
            stderr: "timed out".to_string(),
        })?;
        if !output.status.success() {
            return Err(WorktreeError::GitFailed {
                agent_name: agent_name.to_string(),
                operation: "worktree remove".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let mut branch_cmd = Command::new("git");
        branch_cmd.args(["-C", &self.project_root.display().to_string(), "branch", "-D", branch]);
        let _ = run_with_timeout(branch_cmd, GIT_TIMEOUT, "git branch -D").await;

        if path.exists() {
            let _ = tokio::fs::remove_dir_all(path).await;
        }

        Ok(())
    }

    /// Enumerate worktrees currently registered with git, as reported by
    /// `git worktree list --porcelain`.
    pub async fn list(&self) -> Result<Vec<PathBuf>, WorktreeError> {
        let mut cmd = Command::new("git");
        cmd.args(["-C", &self.project_root.display().to_string(), "worktree", "list", "--porcelain"]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git worktree list").await.map_err(|_| WorktreeError::GitFailed {
            agent_name: String::new(),
            operation: "worktree list".to_string(),
            stderr: "timed out".to_string(),
        })?;
        if !output.status.success() {
            return Err(WorktreeError::GitFailed {
                agent_name: String::new(),
                operation: "worktree list".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let paths = stdout
            .lines()
            .filter_map(|line| line.strip_prefix("worktree "))
            .map(PathBuf::from)
            .collect();
        Ok(paths)
    }

    fn refuse_canonical_root(&self, path: &Path) -> Result<(), WorktreeError> {
        let resolved = dunce_canonicalize(path);
        let root = dunce_canonicalize(&self.project_root);
        if resolved == root {
            return Err(WorktreeError::CanonicalRoot { path: path.display().to_string() });
        }
        Ok(())
    }
}

/// Resolve a path to its canonical form for comparison, falling back to the
/// unresolved path when the target doesn't exist yet (a worktree path about
/// to be created).
fn dunce_canonicalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
