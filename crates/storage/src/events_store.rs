// SPDX-License-Identifier: MIT

//! Event store: the append-only timeline (events.db in spec.md §4.1,
//! consumed by the event bus in spec.md §4.11). The WAL sequence number
//! assigned on append doubles as the event's public `id`, so ordering by
//! `id` and ordering by append order always agree.

use crate::error::StoreError;
use crate::store::{MaterializedState, Store};
use ov_core::{RunId, StoredEvent};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventOp(pub StoredEvent);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsState {
    /// Append order; `StoredEvent::id` equals the index an entry was
    /// assigned, so this vec is always sorted by id as a side effect.
    events: Vec<StoredEvent>,
}

impl MaterializedState for EventsState {
    type Op = EventOp;

    fn apply(&mut self, op: &Self::Op) {
        self.events.push(op.0.clone());
    }
}

pub struct EventStore {
    inner: Store<EventsState>,
}

impl EventStore {
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Ok(Self { inner: Store::open(dir, "events")? })
    }

    /// Append an event, assigning it a monotonic id equal to its WAL
    /// sequence number (`StoredEvent::pending` leaves `id` at 0; this
    /// overwrites it before the op is journaled).
    pub fn append(&self, mut event: StoredEvent) -> Result<u64, StoreError> {
        let seq = self.inner.append_with(|seq| {
            event.id = seq;
            EventOp(event.clone())
        })?;
        Ok(seq)
    }

    pub fn get_by_agent(&self, agent_name: &str) -> Vec<StoredEvent> {
        self.inner.read(|s| s.events.iter().filter(|e| e.agent_name == agent_name).cloned().collect())
    }

    pub fn get_by_run(&self, run_id: RunId) -> Vec<StoredEvent> {
        self.inner.read(|s| s.events.iter().filter(|e| e.run_id == Some(run_id)).cloned().collect())
    }

    /// Entire timeline, non-decreasing in `(createdAt, id)` per spec.md §8.
    pub fn timeline(&self) -> Vec<StoredEvent> {
        self.inner.read(|s| s.events.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ov_core::{EventLevel, EventType};
    use tempfile::tempdir;

    #[test]
    fn append_assigns_increasing_ids() {
        let dir = tempdir().unwrap();
        let store = EventStore::open(dir.path()).unwrap();
        let a = store
            .append(StoredEvent::pending("alice", EventType::SessionStart, EventLevel::Info, None, chrono::Utc::now(), serde_json::json!({})))
            .unwrap();
        let b = store
            .append(StoredEvent::pending("alice", EventType::SessionEnd, EventLevel::Info, None, chrono::Utc::now(), serde_json::json!({})))
            .unwrap();
        assert!(b > a);
    }

    #[test]
    fn get_by_agent_filters_correctly() {
        let dir = tempdir().unwrap();
        let store = EventStore::open(dir.path()).unwrap();
        store
            .append(StoredEvent::pending("alice", EventType::SessionStart, EventLevel::Info, None, chrono::Utc::now(), serde_json::json!({})))
            .unwrap();
        store
            .append(StoredEvent::pending("bob", EventType::SessionStart, EventLevel::Info, None, chrono::Utc::now(), serde_json::json!({})))
            .unwrap();
        assert_eq!(store.get_by_agent("alice").len(), 1);
        assert_eq!(store.get_by_agent("bob").len(), 1);
    }

    #[test]
    fn timeline_is_ordered_by_append_order() {
        let dir = tempdir().unwrap();
        let store = EventStore::open(dir.path()).unwrap();
        for _ in 0..5 {
            store
                .append(StoredEvent::pending("alice", EventType::Custom, EventLevel::Info, None, chrono::Utc::now(), serde_json::json!({})))
                .unwrap();
        }
        let timeline = store.timeline();
        let ids: Vec<u64> = timeline.iter().map(|e| e.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }
}
