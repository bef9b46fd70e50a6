// SPDX-License-Identifier: MIT

//! Shared `deploy_config` plumbing: write the overlay file (if any) to the
//! adapter's `instruction_path`, then write adapter-specific guard bytes to
//! `.overstory/guard` inside the worktree. Both writes are atomic
//! (write-to-temp then rename) so a crash mid-deploy never leaves a
//! half-written file, and the whole operation is idempotent — replaying it
//! with identical inputs produces byte-identical files.

use crate::adapter::RuntimeAdapter;
use crate::error::AgentAdapterError;
use crate::guards::HooksDef;
use std::path::Path;

/// Guard file name written under `<worktree>/.overstory/`.
pub const GUARD_FILE_NAME: &str = "guard";

pub async fn deploy_overlay_and_hooks<A: RuntimeAdapter + ?Sized>(
    adapter: &A,
    worktree: &Path,
    overlay: Option<&str>,
    hooks: &HooksDef,
    render_guard_bytes: impl FnOnce(&HooksDef) -> Result<Vec<u8>, AgentAdapterError>,
) -> Result<(), AgentAdapterError> {
    if worktree.as_os_str().is_empty() || worktree == Path::new("/") {
        return Err(AgentAdapterError::CanonicalRoot {
            runtime: adapter.id().to_string(),
            path: worktree.display().to_string(),
        });
    }

    if let Some(overlay) = overlay {
        let instruction_path = worktree.join(adapter.instruction_path());
        atomic_write(adapter.id(), &instruction_path, overlay.as_bytes()).await?;
    }

    let guard_dir = worktree.join(".overstory");
    tokio::fs::create_dir_all(&guard_dir)
        .await
        .map_err(|source| AgentAdapterError::Io { runtime: adapter.id().to_string(), path: guard_dir.display().to_string(), source })?;
    let guard_path = guard_dir.join(GUARD_FILE_NAME);
    let bytes = render_guard_bytes(hooks)?;
    atomic_write(adapter.id(), &guard_path, &bytes).await?;

    Ok(())
}

async fn atomic_write(runtime: &str, path: &Path, bytes: &[u8]) -> Result<(), AgentAdapterError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| AgentAdapterError::Io { runtime: runtime.to_string(), path: path.display().to_string(), source })?;
    }
    let tmp_path = path.with_extension("tmp");
    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(|source| AgentAdapterError::Io { runtime: runtime.to_string(), path: path.display().to_string(), source })?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|source| AgentAdapterError::Io { runtime: runtime.to_string(), path: path.display().to_string(), source })?;
    Ok(())
}
