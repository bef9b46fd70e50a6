// SPDX-License-Identifier: MIT

//! `TaskTracker`: the external issue-tracker collaborator spawn validation
//! consults in step 1. The tracker itself is out of scope — only this
//! interface is specified.

use async_trait::async_trait;

#[async_trait]
pub trait TaskTracker: Send + Sync + 'static {
    async fn exists(&self, task_id: &str) -> bool;
}

/// A tracker that treats every task id as existing. Useful for standalone
/// runs and tests where no external tracker is wired in.
pub struct AlwaysPresentTracker;

#[async_trait]
impl TaskTracker for AlwaysPresentTracker {
    async fn exists(&self, _task_id: &str) -> bool {
        true
    }
}
