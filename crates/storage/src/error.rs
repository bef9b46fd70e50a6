// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Store open/query failure (spec.md §7's `StoreError`).
///
/// Open failures (`Io`, `NotWritable`, `Corrupt`) are fatal for the command
/// that issued them; query failures never silently disappear — they always
/// propagate to the caller, typed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("store directory not writable: {path}")]
    NotWritable { path: PathBuf },

    #[error("corrupt store at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("no entry found for key {0:?}")]
    NotFound(String),

    #[error("duplicate key {0:?}")]
    Duplicate(String),
}

impl From<ov_core::StoreError> for StoreError {
    fn from(e: ov_core::StoreError) -> Self {
        match e {
            ov_core::StoreError::Io { path, source } => StoreError::Io { path: path.into(), source },
            ov_core::StoreError::NotWritable { path } => StoreError::NotWritable { path: path.into() },
            ov_core::StoreError::Corrupt { path, reason } => StoreError::Corrupt { path: path.into(), reason },
            ov_core::StoreError::Serde(e) => StoreError::Serde(e),
        }
    }
}
