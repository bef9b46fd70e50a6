// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Spawn pipeline failure. Wraps the lower-level component errors so
/// callers see one error type regardless of which step failed.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error(transparent)]
    Agent(#[from] ov_core::AgentError),
    #[error(transparent)]
    Worktree(#[from] ov_core::WorktreeError),
    #[error(transparent)]
    Session(#[from] ov_core::SessionError),
    #[error(transparent)]
    Store(#[from] ov_storage::StoreError),
    #[error(transparent)]
    Overlay(#[from] ov_overlay::OverlayError),
    #[error(transparent)]
    Adapter(#[from] ov_adapters::AgentAdapterError),
}
