// SPDX-License-Identifier: MIT

//! Timeout-bounded subprocess execution, the pattern the teacher uses for
//! every git/tmux invocation: a plain `tokio::process::Command`, never a
//! library binding, wrapped with `tokio::time::timeout` so a hung child
//! process can't wedge the caller forever.

use std::time::Duration;
use tokio::process::Command;

pub const GIT_TIMEOUT: Duration = Duration::from_secs(30);

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
