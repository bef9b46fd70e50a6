// SPDX-License-Identifier: MIT

//! Installs the global `tracing` subscriber once at daemon startup, writing
//! to a rotating file appender under `<project>/.overstory/logs/` (spec.md
//! §6's persisted-state layout) with an `EnvFilter` seeded from
//! `LoggingConfig`/`RUST_LOG`.

use crate::config::LoggingConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Returned so the caller keeps the non-blocking writer's guard alive for
/// the daemon's lifetime — dropping it early would silently stop flushing
/// buffered log lines.
pub struct LoggingGuard(#[allow(dead_code)] tracing_appender::non_blocking::WorkerGuard);

pub fn init(project_root: &Path, config: &LoggingConfig) -> LoggingGuard {
    let log_dir = project_root.join(".overstory").join(&config.directory);
    let file_appender = tracing_appender::rolling::daily(log_dir, "overstory.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(non_blocking).with_ansi(false).init();

    LoggingGuard(guard)
}
