// SPDX-License-Identifier: MIT

//! `PaneManager`: create, send input to, capture output from, and tear down
//! tmux panes hosting agent processes (spec.md §4.4). Shells out to the
//! `tmux` binary, matching the teacher's own `listener/tmux.rs` pattern for
//! pane capture and session teardown.

use crate::subprocess::{run_with_timeout, TMUX_TIMEOUT};
use ov_core::SessionError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::process::Command;

/// Number of trailing lines `capture_pane` returns, matching the teacher's
/// `-S -40`-style bounded scrollback capture (wide enough for readiness
/// detection without unbounded growth on long-lived panes).
const CAPTURE_LINES: &str = "-100";

/// Serializes `send_keys` calls per pane name so concurrent callers never
/// interleave keystrokes into the same pane (spec.md §4.4's concurrency
/// contract).
#[derive(Default)]
pub struct PaneManager {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl PaneManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.locks.lock().entry(name.to_string()).or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))).clone()
    }

    /// Open a new detached tmux session named `name`, running `command` with
    /// cwd `cwd` and the given environment variables exported into the
    /// session's shell before `command` runs.
    pub async fn create_session(&self, name: &str, cwd: &Path, env: &HashMap<String, String>, command: &str) -> Result<(), SessionError> {
        let mut full_command = String::new();
        for (key, value) in env {
            full_command.push_str(&format!("{}={} ", key, shell_quote(value)));
        }
        full_command.push_str(command);

        let mut cmd = Command::new("tmux");
        cmd.args(["new-session", "-d", "-s", name, "-c", &cwd.display().to_string(), &full_command]);
        let output = run(cmd, "tmux new-session").await?;
        if !output.status.success() {
            return Err(SessionError::OperationFailed {
                pane_id: name.to_string(),
                operation: "new-session".to_string(),
                stderr: stderr_of(&output),
            });
        }
        Ok(())
    }

    /// Send literal `text` followed by Enter. Serialized per pane name.
    pub async fn send_keys(&self, name: &str, text: &str) -> Result<(), SessionError> {
        let lock = self.lock_for(name);
        let _guard = lock.lock().await;

        let mut literal_cmd = Command::new("tmux");
        literal_cmd.args(["send-keys", "-t", name, "-l", text]);
        let output = run(literal_cmd, "tmux send-keys (literal)").await?;
        if !output.status.success() {
            return Err(SessionError::OperationFailed { pane_id: name.to_string(), operation: "send-keys".to_string(), stderr: stderr_of(&output) });
        }

        let mut enter_cmd = Command::new("tmux");
        enter_cmd.args(["send-keys", "-t", name, "Enter"]);
        let output = run(enter_cmd, "tmux send-keys (enter)").await?;
        if !output.status.success() {
            return Err(SessionError::OperationFailed { pane_id: name.to_string(), operation: "send-keys".to_string(), stderr: stderr_of(&output) });
        }
        Ok(())
    }

    /// Return the pane's current visible content.
    pub async fn capture_pane(&self, name: &str) -> Result<String, SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["capture-pane", "-t", name, "-p", "-S", CAPTURE_LINES]);
        let output = run(cmd, "tmux capture-pane").await?;
        if !output.status.success() {
            return Err(SessionError::NotFound { pane_id: name.to_string() });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Tear down a tmux session. Never retries — a black-box multiplexer
    /// failure here is surfaced, not papered over.
    pub async fn kill_session(&self, name: &str) -> Result<(), SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["kill-session", "-t", name]);
        let output = run(cmd, "tmux kill-session").await?;
        if !output.status.success() {
            return Err(SessionError::OperationFailed {
                pane_id: name.to_string(),
                operation: "kill-session".to_string(),
                stderr: stderr_of(&output),
            });
        }
        Ok(())
    }

    /// Enumerate all live tmux session names.
    pub async fn list_sessions(&self) -> Result<Vec<String>, SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["list-sessions", "-F", "#{session_name}"]);
        let output = run(cmd, "tmux list-sessions").await?;
        if !output.status.success() {
            // tmux exits non-zero when no server is running — that's an
            // empty list, not an error.
            return Ok(Vec::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout).lines().map(str::to_string).collect())
    }
}

async fn run(cmd: Command, label: &str) -> Result<std::process::Output, SessionError> {
    run_with_timeout(cmd, TMUX_TIMEOUT, label).await.map_err(|_| SessionError::OperationFailed {
        pane_id: String::new(),
        operation: label.to_string(),
        stderr: "timed out".to_string(),
    })
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
