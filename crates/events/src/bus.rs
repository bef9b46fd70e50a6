// SPDX-License-Identifier: MIT

//! `EventBus`: the three query shapes named in spec.md §4.11, plus
//! `append`, wrapping `ov_storage::EventStore`.

use crate::query::EventQuery;
use ov_core::{RunId, StoredEvent};
use ov_storage::{EventStore, StoreError};
use std::sync::Arc;

pub struct EventBus {
    store: Arc<EventStore>,
}

impl EventBus {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }

    /// Append an event, returning the monotonic id the store assigned.
    /// Consumers can poll by `id > last_seen` for incremental streaming
    /// (spec.md §4.11).
    pub fn append(&self, event: StoredEvent) -> Result<u64, StoreError> {
        self.store.append(event)
    }

    pub fn get_by_agent(&self, agent_name: &str, query: &EventQuery) -> Vec<StoredEvent> {
        query.apply(self.store.get_by_agent(agent_name))
    }

    pub fn get_by_run(&self, run_id: RunId, query: &EventQuery) -> Vec<StoredEvent> {
        query.apply(self.store.get_by_run(run_id))
    }

    pub fn get_timeline(&self, query: &EventQuery) -> Vec<StoredEvent> {
        query.apply(self.store.timeline())
    }
}
