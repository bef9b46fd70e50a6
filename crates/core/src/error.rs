// SPDX-License-Identifier: MIT

//! Shared error vocabulary.
//!
//! Every component-specific error type (in `ov-storage`, `ov-worktree`,
//! `ov-pane`, `ov-adapters`, `ov-spawner`, `ov-merge`, ...) wraps into one of
//! these kinds via `#[from]` or a `.code()` accessor, so callers at the
//! daemon boundary can render a stable error code without matching on every
//! crate's local enum.

use thiserror::Error;

/// Bad input from a caller: invalid interval, unknown category, malformed
/// timestamp. Always surfaced to the user, never logged-and-swallowed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: String, value: String },
}

/// Version-control operation failed.
#[derive(Debug, Error)]
pub enum WorktreeError {
    #[error("not a git repository at {path}; run init first")]
    NotAGitRepository { path: String },
    #[error("refusing to operate on the canonical project root: {path}")]
    CanonicalRoot { path: String },
    #[error("worktree path already in use: {path}")]
    AlreadyExists { path: String },
    #[error("git {operation} failed for agent {agent_name}: {stderr}")]
    GitFailed { agent_name: String, operation: String, stderr: String },
}

/// Any failure in the spawn pipeline or runtime deployment.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {agent_name}: {message}")]
    Generic { agent_name: String, message: String },
    #[error("agent {agent_name}: readiness timed out after {timeout_ms}ms")]
    ReadinessTimeout { agent_name: String, timeout_ms: u64 },
    #[error("agent {agent_name}: depth {depth} exceeds configured max {max_depth}")]
    DepthExceeded { agent_name: String, depth: u32, max_depth: u32 },
    #[error("agent {agent_name}: parent {parent} cannot spawn sub-agents")]
    ParentCannotSpawn { agent_name: String, parent: String },
    #[error("agent {agent_name}: parent {parent} has reached its sub-agent ceiling")]
    SubAgentCeiling { agent_name: String, parent: String },
    #[error("agent {agent_name}: unknown runtime {runtime}")]
    UnknownRuntime { agent_name: String, runtime: String },
}

/// Database open/query failure. Fatal for the command issuing it, but never
/// fatal for peer components sharing the same process.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error opening store at {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("store directory not writable: {path}")]
    NotWritable { path: String },
    #[error("corrupt store at {path}: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Terminal multiplexer operation failed.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("pane {pane_id} not found")]
    NotFound { pane_id: String },
    #[error("pane {pane_id}: {operation} failed: {stderr}")]
    OperationFailed { pane_id: String, operation: String, stderr: String },
}

/// Merge attempt failed.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("branch {branch}: {reason}")]
    Failed { branch: String, reason: String },
    #[error("branch {branch}: conflict: {summary}")]
    Conflict { branch: String, summary: String },
}
