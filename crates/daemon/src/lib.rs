// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ov-daemon: the long-running process that owns a project's stores and
//! drives the watchdog, merger-drain, and metrics-flush tasks, and exposes
//! the spawn pipeline to whatever issues spawn requests.

pub mod config;
pub mod daemon;
pub mod error;
pub mod logging;
pub mod stores;
pub mod tasks;

pub use config::Config;
pub use daemon::Daemon;
pub use error::DaemonError;
