// SPDX-License-Identifier: MIT

//! The merger: claims pending merge-queue entries one at a time and
//! attempts to fold each branch into the canonical branch (spec.md §4.10).
//! Operates directly in the canonical project root — the one worktree that
//! always has the canonical branch checked out.

use crate::config::MergerConfig;
use chrono::Utc;
use ov_adapters::RuntimeAdapter;
use ov_core::{MergeError, MergeQueueEntry, MergeStatus, Message, MessageType, Priority, ORCHESTRATOR};
use ov_mail::MailBus;
use ov_storage::MergeQueueStore;
use ov_worktree::subprocess::{run_with_timeout, GIT_TIMEOUT};
use std::process::Output;
use std::sync::Arc;
use tokio::process::Command;

pub struct Merger {
    config: MergerConfig,
    queue: Arc<MergeQueueStore>,
    mail: Arc<MailBus>,
    /// Present only when tier 2 (AI-assisted resolution) is configured on.
    adapter: Option<Arc<dyn RuntimeAdapter>>,
}

impl Merger {
    pub fn new(config: MergerConfig, queue: Arc<MergeQueueStore>, mail: Arc<MailBus>, adapter: Option<Arc<dyn RuntimeAdapter>>) -> Self {
        Self { config, queue, mail, adapter }
    }

    /// Drain every pending entry, serially — the queue never runs two
    /// merges concurrently (spec.md §4.10, §5).
    pub async fn drain(&self) {
        for entry in self.queue.pending() {
            if let Err(err) = self.merge_one(&entry).await {
                tracing::warn!(branch = %entry.branch_name, agent_name = %entry.agent_name, error = %err, "merger: entry did not merge");
            }
        }
    }

    async fn merge_one(&self, entry: &MergeQueueEntry) -> Result<(), MergeError> {
        self.set_status(entry, MergeStatus::Merging, None);

        match self.attempt_merge(&entry.branch_name).await? {
            MergeAttempt::Clean => {
                self.set_status(entry, MergeStatus::Merged, None);
                tracing::info!(branch = %entry.branch_name, agent_name = %entry.agent_name, "merger: fast-forward/clean merge succeeded");
                return Ok(());
            }
            MergeAttempt::Conflict { files } => {
                tracing::info!(branch = %entry.branch_name, conflicted_files = files.len(), "merger: conflict, escalating tiers");
                self.abort_merge().await;

                if let Some(adapter) = self.adapter.clone() {
                    if self.config.tier_two.enabled {
                        if self.try_tier_two(entry, &files, &adapter).await? {
                            self.set_status(entry, MergeStatus::Merged, None);
                            return Ok(());
                        }
                    }
                }

                let summary = format!("conflict in: {}", files.join(", "));
                self.set_status(entry, MergeStatus::Conflict, Some(summary.clone()));
                self.notify_conflict(entry, &summary).await;
                return Err(MergeError::Conflict { branch: entry.branch_name.clone(), summary });
            }
        }
    }

    /// Attempt tier 2 up to `max_retries` times. Returns `Ok(true)` on a
    /// patch that applied and passed quality gates, `Ok(false)` when every
    /// retry was exhausted (caller demotes to tier 3).
    async fn try_tier_two(&self, entry: &MergeQueueEntry, conflicted_files: &[String], adapter: &Arc<dyn RuntimeAdapter>) -> Result<bool, MergeError> {
        let attempts = self.config.tier_two.max_retries + 1;
        for attempt in 0..attempts {
            // Re-attempt the real merge first so each retry sees the
            // current conflict markers rather than stale ones.
            let conflict_markers = self.start_conflicted_merge(&entry.branch_name).await?;
            let prompt = tier_two_prompt(&entry.branch_name, conflicted_files, &conflict_markers);
            let argv = adapter.build_print_command(&prompt, self.config.tier_two.model.as_deref());

            let patch = match self.run_print_command(&argv).await {
                Some(output) if output.status.success() => String::from_utf8_lossy(&output.stdout).to_string(),
                _ => {
                    self.abort_merge().await;
                    tracing::warn!(branch = %entry.branch_name, attempt, "merger: tier 2 print command failed or timed out");
                    continue;
                }
            };

            if self.apply_patch(&patch).await && self.run_quality_gates().await {
                if self.commit_tier_two(&entry.branch_name).await {
                    return Ok(true);
                }
            }
            self.reset_working_tree().await;
            self.abort_merge().await;
        }
        Ok(false)
    }

    async fn attempt_merge(&self, branch: &str) -> Result<MergeAttempt, MergeError> {
        let mut cmd = Command::new("git");
        cmd.args(["-C", &self.root(), "merge", "--no-ff", "--no-edit", branch]);
        let output = self.git(cmd, "git merge").await?;
        if output.status.success() {
            return Ok(MergeAttempt::Clean);
        }
        Ok(MergeAttempt::Conflict { files: self.conflicted_files().await })
    }

    /// Re-start a merge that's expected to conflict, and return the
    /// conflict-marker excerpt from each conflicted file for the tier-2 prompt.
    async fn start_conflicted_merge(&self, branch: &str) -> Result<Vec<(String, String)>, MergeError> {
        let mut cmd = Command::new("git");
        cmd.args(["-C", &self.root(), "merge", "--no-ff", "--no-edit", branch]);
        let _ = self.git(cmd, "git merge (tier2 retry)").await?;

        let mut excerpts = Vec::new();
        for file in self.conflicted_files().await {
            let path = self.config.project_root.join(&file);
            if let Ok(contents) = tokio::fs::read_to_string(&path).await {
                let excerpt: String = contents.lines().take(60).collect::<Vec<_>>().join("\n");
                excerpts.push((file, excerpt));
            }
        }
        Ok(excerpts)
    }

    async fn conflicted_files(&self) -> Vec<String> {
        let mut cmd = Command::new("git");
        cmd.args(["-C", &self.root(), "diff", "--name-only", "--diff-filter=U"]);
        match run_with_timeout(cmd, GIT_TIMEOUT, "git diff --diff-filter=U").await {
            Ok(output) => String::from_utf8_lossy(&output.stdout).lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    async fn abort_merge(&self) {
        let mut cmd = Command::new("git");
        cmd.args(["-C", &self.root(), "merge", "--abort"]);
        let _ = run_with_timeout(cmd, GIT_TIMEOUT, "git merge --abort").await;
    }

    async fn reset_working_tree(&self) {
        let mut cmd = Command::new("git");
        cmd.args(["-C", &self.root(), "reset", "--hard", "HEAD"]);
        let _ = run_with_timeout(cmd, GIT_TIMEOUT, "git reset --hard").await;
    }

    async fn apply_patch(&self, patch: &str) -> bool {
        let Ok(mut tmp) = tempfile_patch(patch).await else { return false };
        let mut cmd = Command::new("git");
        cmd.args(["-C", &self.root(), "apply", &tmp.display_path()]);
        let applied = matches!(run_with_timeout(cmd, GIT_TIMEOUT, "git apply").await, Ok(o) if o.status.success());
        tmp.cleanup().await;
        applied
    }

    async fn run_quality_gates(&self) -> bool {
        for gate in &self.config.quality_gates {
            let mut parts = gate.command.split_whitespace();
            let Some(program) = parts.next() else { continue };
            let mut cmd = Command::new(program);
            cmd.args(parts).current_dir(&self.config.project_root);
            match run_with_timeout(cmd, GIT_TIMEOUT, &gate.name).await {
                Ok(output) if output.status.success() => {}
                _ => {
                    tracing::info!(gate = %gate.name, "merger: tier 2 patch failed quality gate");
                    return false;
                }
            }
        }
        true
    }

    async fn commit_tier_two(&self, branch: &str) -> bool {
        let mut add = Command::new("git");
        add.args(["-C", &self.root(), "add", "-A"]);
        if run_with_timeout(add, GIT_TIMEOUT, "git add").await.is_err() {
            return false;
        }
        let mut commit = Command::new("git");
        commit.args(["-C", &self.root(), "commit", "-m", &format!("merge: tier-2 resolve {branch}")]);
        matches!(run_with_timeout(commit, GIT_TIMEOUT, "git commit").await, Ok(o) if o.status.success())
    }

    async fn run_print_command(&self, argv: &[String]) -> Option<Output> {
        let (program, args) = argv.split_first()?;
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&self.config.project_root);
        run_with_timeout(cmd, self.config.tier_two.timeout, "print-command").await.ok()
    }

    async fn notify_conflict(&self, entry: &MergeQueueEntry, summary: &str) {
        let message = Message::new(
            entry.agent_name.clone(),
            ORCHESTRATOR,
            format!("merge conflict: {}", entry.branch_name),
            summary.to_string(),
            MessageType::Error,
            Utc::now(),
        )
        .with_priority(Priority::Urgent);
        if let Err(err) = self.mail.send(message.from, message.to, message.subject, message.body, message.message_type, message.priority, None, Utc::now()) {
            tracing::warn!(branch = %entry.branch_name, error = %err, "merger: failed to notify orchestrator of conflict");
        }
    }

    fn set_status(&self, entry: &MergeQueueEntry, status: MergeStatus, conflict_summary: Option<String>) {
        if let Err(err) = self.queue.set_status(entry.id, status, conflict_summary) {
            tracing::warn!(entry_id = %entry.id, error = %err, "merger: failed to write queue status");
        }
    }

    fn root(&self) -> String {
        self.config.project_root.display().to_string()
    }

    async fn git(&self, cmd: Command, label: &str) -> Result<Output, MergeError> {
        run_with_timeout(cmd, GIT_TIMEOUT, label).await.map_err(|_| MergeError::Failed { branch: String::new(), reason: format!("{label} timed out") })
    }
}

enum MergeAttempt {
    Clean,
    Conflict { files: Vec<String> },
}

fn tier_two_prompt(branch: &str, files: &[String], excerpts: &[(String, String)]) -> String {
    let mut prompt = format!("Resolve the merge conflict merging branch {branch} into the canonical branch.\nConflicted files: {}\n\n", files.join(", "));
    for (file, excerpt) in excerpts {
        prompt.push_str(&format!("--- {file} ---\n{excerpt}\n\n"));
    }
    prompt.push_str("Output a unified diff patch that resolves every conflict marker. Output only the patch.");
    prompt
}

struct PatchFile(std::path::PathBuf);

impl PatchFile {
    fn display_path(&self) -> String {
        self.0.display().to_string()
    }

    async fn cleanup(&mut self) {
        let _ = tokio::fs::remove_file(&self.0).await;
    }
}

async fn tempfile_patch(patch: &str) -> std::io::Result<PatchFile> {
    let path = std::env::temp_dir().join(format!("ov-merge-{}.patch", nanoid::nanoid!(8)));
    tokio::fs::write(&path, patch).await?;
    Ok(PatchFile(path))
}

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;
