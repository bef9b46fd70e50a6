// SPDX-License-Identifier: MIT

//! Top-level error type for the bootstrap path. Downstream operation
//! errors (spawn, merge, mail) keep their own typed errors; this enum only
//! covers what can go wrong before a `Daemon` exists.

use crate::config::ConfigError;
use ov_storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
