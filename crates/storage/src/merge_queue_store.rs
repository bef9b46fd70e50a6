// SPDX-License-Identifier: MIT

//! Merge queue store: the materialized table of `MergeQueueEntry` records
//! (merge-queue.db in spec.md §4.1), ordered FIFO by enqueue time.

use crate::error::StoreError;
use crate::store::{MaterializedState, Store};
use ov_core::{MergeQueueEntry, MergeQueueEntryId, MergeStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MergeQueueOp {
    Enqueue(MergeQueueEntry),
    SetStatus { id: MergeQueueEntryId, status: MergeStatus, conflict_summary: Option<String> },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeQueueState {
    by_id: HashMap<MergeQueueEntryId, MergeQueueEntry>,
    order: Vec<MergeQueueEntryId>,
}

impl MaterializedState for MergeQueueState {
    type Op = MergeQueueOp;

    fn apply(&mut self, op: &Self::Op) {
        match op {
            MergeQueueOp::Enqueue(entry) => {
                self.order.push(entry.id);
                self.by_id.insert(entry.id, entry.clone());
            }
            MergeQueueOp::SetStatus { id, status, conflict_summary } => {
                if let Some(entry) = self.by_id.get_mut(id) {
                    entry.status = *status;
                    entry.conflict_summary = conflict_summary.clone();
                }
            }
        }
    }
}

pub struct MergeQueueStore {
    inner: Store<MergeQueueState>,
}

impl MergeQueueStore {
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Ok(Self { inner: Store::open(dir, "merge_queue")? })
    }

    pub fn enqueue(&self, entry: MergeQueueEntry) -> Result<MergeQueueEntryId, StoreError> {
        let id = entry.id;
        self.inner.append(MergeQueueOp::Enqueue(entry))?;
        Ok(id)
    }

    pub fn set_status(&self, id: MergeQueueEntryId, status: MergeStatus, conflict_summary: Option<String>) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.inner.append(MergeQueueOp::SetStatus { id, status, conflict_summary })?;
        Ok(())
    }

    pub fn get(&self, id: MergeQueueEntryId) -> Option<MergeQueueEntry> {
        self.inner.read(|s| s.by_id.get(&id).cloned())
    }

    /// Entries still awaiting a merge attempt, in FIFO enqueue order.
    pub fn pending(&self) -> Vec<MergeQueueEntry> {
        self.inner.read(|s| {
            s.order.iter().filter_map(|id| s.by_id.get(id)).filter(|e| e.status == MergeStatus::Pending).cloned().collect()
        })
    }

    pub fn all(&self) -> Vec<MergeQueueEntry> {
        self.inner.read(|s| s.order.iter().filter_map(|id| s.by_id.get(id)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn enqueue_then_pending_preserves_fifo_order() {
        let dir = tempdir().unwrap();
        let store = MergeQueueStore::open(dir.path()).unwrap();
        store.enqueue(MergeQueueEntry::new("overstory/a/t1", "a", chrono::Utc::now())).unwrap();
        store.enqueue(MergeQueueEntry::new("overstory/b/t2", "b", chrono::Utc::now())).unwrap();
        let pending = store.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].agent_name, "a");
        assert_eq!(pending[1].agent_name, "b");
    }

    #[test]
    fn set_status_to_merged_removes_from_pending() {
        let dir = tempdir().unwrap();
        let store = MergeQueueStore::open(dir.path()).unwrap();
        let id = store.enqueue(MergeQueueEntry::new("overstory/a/t1", "a", chrono::Utc::now())).unwrap();
        store.set_status(id, MergeStatus::Merged, None).unwrap();
        assert!(store.pending().is_empty());
        assert_eq!(store.get(id).unwrap().status, MergeStatus::Merged);
    }

    #[test]
    fn set_status_records_conflict_summary() {
        let dir = tempdir().unwrap();
        let store = MergeQueueStore::open(dir.path()).unwrap();
        let id = store.enqueue(MergeQueueEntry::new("overstory/a/t1", "a", chrono::Utc::now())).unwrap();
        store.set_status(id, MergeStatus::Conflict, Some("conflict in src/lib.rs".to_string())).unwrap();
        assert_eq!(store.get(id).unwrap().conflict_summary.as_deref(), Some("conflict in src/lib.rs"));
    }
}
