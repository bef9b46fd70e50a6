// SPDX-License-Identifier: MIT

//! `overstory-daemon`: boots a `Daemon` for the project rooted at
//! `OVERSTORY_PROJECT_ROOT` (or the current directory) and runs its
//! long-lived tasks (watchdog, merger-drain, metrics-flush) until it
//! receives SIGINT/SIGTERM.
//!
//! The spawn-request surface, the CLI subcommands, and the TUI dashboard
//! that would normally drive `Daemon::spawn_agent` are out of scope here
//! (spec.md §1's Non-goals) — this binary only owns the background tasks.

use ov_daemon::{Config, Daemon};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let project_root = project_root();
    let config = load_config(&project_root);

    let _logging_guard = ov_daemon::logging::init(&project_root, &config.logging);

    let mut daemon = match Daemon::bootstrap(project_root.clone(), config) {
        Ok(daemon) => daemon,
        Err(err) => {
            eprintln!("overstory-daemon: failed to start: {err}");
            return std::process::ExitCode::FAILURE;
        }
    };

    daemon.run();
    tracing::info!(project_root = %project_root.display(), "overstory-daemon: running");

    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "overstory-daemon: failed to install ctrl-c handler, shutting down anyway");
    }

    tracing::info!("overstory-daemon: shutdown signal received");
    daemon.shutdown().await;
    std::process::ExitCode::SUCCESS
}

fn project_root() -> PathBuf {
    std::env::var("OVERSTORY_PROJECT_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// A missing or unparseable `config.yaml` falls back to every section's
/// `Default` rather than failing the daemon to start — the (out-of-scope)
/// init/bootstrap flow is what normally writes this file.
fn load_config(project_root: &std::path::Path) -> Config {
    let path = project_root.join(".overstory").join("config.yaml");
    match Config::load(&path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("overstory-daemon: using defaults, could not load {}: {err}", path.display());
            Config::default()
        }
    }
}
