// SPDX-License-Identifier: MIT

//! Timeout-bounded subprocess execution for tmux invocations, matching
//! `ov_worktree::subprocess`'s pattern for git.

use std::time::Duration;
use tokio::process::Command;

pub const TMUX_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct TimedOut;

/// Run `cmd`, returning its output or [`TimedOut`] if it runs longer than
/// `timeout`. The child process is killed on timeout.
pub async fn run_with_timeout(mut cmd: Command, timeout: Duration, label: &str) -> Result<std::process::Output, TimedOut> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => {
            tracing::warn!(label, error = %e, "subprocess failed to spawn");
            Err(TimedOut)
        }
        Err(_) => {
            tracing::warn!(label, timeout_secs = timeout.as_secs(), "subprocess timed out");
            Err(TimedOut)
        }
    }
}
