// SPDX-License-Identifier: MIT

//! Opens the five stores under `<project>/.overstory/` (spec.md §6).

use ov_storage::{EventStore, MailStore, MergeQueueStore, MetricsStore, SessionStore, StoreError};
use std::path::Path;
use std::sync::Arc;

pub struct Stores {
    pub sessions: Arc<SessionStore>,
    pub mail: Arc<MailStore>,
    pub merge_queue: Arc<MergeQueueStore>,
    pub events: Arc<EventStore>,
    pub metrics: Arc<MetricsStore>,
}

impl Stores {
    /// Open every store rooted at `<project_root>/.overstory/`. Each store
    /// keeps its own WAL handle — per spec.md §5, a long-lived task never
    /// shares a store handle with another task.
    pub fn open(project_root: &Path) -> Result<Self, StoreError> {
        let root = project_root.join(".overstory");
        Ok(Self {
            sessions: Arc::new(SessionStore::open(&root)?),
            mail: Arc::new(MailStore::open(&root)?),
            merge_queue: Arc::new(MergeQueueStore::open(&root)?),
            events: Arc::new(EventStore::open(&root)?),
            metrics: Arc::new(MetricsStore::open(&root)?),
        })
    }
}
