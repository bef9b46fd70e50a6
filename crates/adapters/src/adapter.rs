// SPDX-License-Identifier: MIT

//! The uniform capability interface every runtime adapter implements
//! (spec.md §4.2). Adapters are stateless; the registry in [`crate::registry`]
//! hands out one shared instance per variant.

use crate::error::AgentAdapterError;
use crate::guards::HooksDef;
use async_trait::async_trait;
use ov_core::PermissionMode;
use std::collections::HashMap;
use std::path::Path;

/// Where the model and append-system-prompt text come from for one spawn.
/// `append_system_prompt` prefers the path form over an inline string so the
/// multiplexer never has to shell-interpolate arbitrarily large text (spec.md
/// §4.2: "Path-form preferred ... to avoid multiplexer IPC size limits").
#[derive(Debug, Clone)]
pub struct SpawnCommandOptions {
    pub model: String,
    pub permission_mode: PermissionMode,
    /// Informational only — the adapter must not embed this in the returned
    /// command string; the spawner sets it as the pane's actual cwd.
    pub cwd: std::path::PathBuf,
    /// Informational only — same rule as `cwd`.
    pub env: HashMap<String, String>,
    pub append_system_prompt: Option<AppendSystemPrompt>,
}

#[derive(Debug, Clone)]
pub enum AppendSystemPrompt {
    Text(String),
    Path(std::path::PathBuf),
}

/// Result of [`RuntimeAdapter::detect_ready`]: a pure classification of one
/// pane-text snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    /// A dialog is blocking the agent; `action` is the literal text to send
    /// to dismiss it (e.g. an arrow-key sequence or a numbered choice).
    Dialog(String),
    Ready,
}

/// Normalized transcript summary returned by [`RuntimeAdapter::parse_transcript`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSummary {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub model: String,
}

/// The uniform interface every supported coding-assistant CLI implements
/// (spec.md §4.2).
#[async_trait]
pub trait RuntimeAdapter: Send + Sync + 'static {
    /// Stable string identifier used in stored sessions (`AgentSession::runtime`).
    fn id(&self) -> &'static str;

    /// Relative path within a worktree to the overlay file this adapter reads.
    fn instruction_path(&self) -> &'static str;

    /// Build a deterministic shell command string for spawning this runtime.
    /// Must never embed `opts.cwd` or `opts.env` in the returned string — both
    /// are informational, applied by the caller (the pane manager).
    fn build_spawn_command(&self, opts: &SpawnCommandOptions) -> String;

    /// Build an argv array for a one-shot invocation (used by the merge
    /// resolver and health triage).
    fn build_print_command(&self, prompt: &str, model: Option<&str>) -> Vec<String>;

    /// Write the overlay file (when provided) and the runtime-specific guard
    /// configuration derived from `hooks`. Idempotent: calling twice with the
    /// same inputs overwrites to the same byte-identical result.
    async fn deploy_config(
        &self,
        worktree: &Path,
        overlay: Option<&str>,
        hooks: &HooksDef,
    ) -> Result<(), AgentAdapterError>;

    /// Pure function of a textual pane capture.
    fn detect_ready(&self, pane_snapshot: &str) -> ReadyState;

    /// Parse this runtime's transcript file. Returns `None` when the file
    /// does not exist or contains no parseable records; malformed lines are
    /// skipped, never fatal.
    fn parse_transcript(&self, path: &Path) -> Option<TranscriptSummary>;

    /// Environment variables to inject into the spawned process for the
    /// given resolved model.
    fn build_env(&self, resolved_model: &str) -> HashMap<String, String>;

    /// True iff this runtime's terminal sometimes swallows the initial Enter
    /// during late initialization, requiring the spawner to re-check
    /// readiness and resend the beacon once.
    fn requires_beacon_verification(&self) -> bool;
}
