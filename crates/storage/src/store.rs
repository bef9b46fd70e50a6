// SPDX-License-Identifier: MIT

//! Generic single-writer, WAL-journaled, snapshot-checkpointed store.
//!
//! Every store in spec.md §4.1 (sessions, mail, merge queue, events,
//! metrics) is an instantiation of `Store<S>` for a domain-specific
//! materialized-state type `S`. Opening is idempotent: it loads the latest
//! snapshot (if any), then replays every WAL entry after that snapshot's
//! sequence number — equivalent in spirit to a SQL `CREATE TABLE IF NOT
//! EXISTS`, since re-opening an already-current store is a no-op that just
//! rebuilds the same in-memory state.

use crate::error::StoreError;
use crate::wal::Wal;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A materialized, in-memory view built by folding operations over time.
///
/// Implementations MUST be idempotent: applying the same op twice must
/// produce the same state as applying it once, because WAL replay and live
/// appends both flow through `apply`.
pub trait MaterializedState: Default + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Op: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    fn apply(&mut self, op: &Self::Op);
}

/// Number of appends between automatic checkpoints, bounding how much WAL a
/// crash-recovery replay needs to process.
const CHECKPOINT_INTERVAL: u64 = 500;

pub struct Store<S: MaterializedState> {
    wal: RwLock<Wal>,
    state: RwLock<S>,
    snapshot_path: PathBuf,
    appends_since_checkpoint: RwLock<u64>,
}

impl<S: MaterializedState> Store<S> {
    /// Open (or create) the store rooted at `dir/<name>`. Creates
    /// `<name>.wal` and, lazily, `<name>.snapshot`.
    pub fn open(dir: &Path, name: &str) -> Result<Self, StoreError> {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io { path: dir.to_path_buf(), source })?;
        }
        let wal_path = dir.join(format!("{name}.wal"));
        let snapshot_path = dir.join(format!("{name}.snapshot"));

        let (mut state, snapshot_seq) = match crate::snapshot::load::<S>(&snapshot_path)? {
            Some((seq, state)) => (state, Some(seq)),
            None => (S::default(), None),
        };

        let min_next_seq = snapshot_seq.map(|s| s + 1).unwrap_or(0);
        let wal = Wal::open(&wal_path, min_next_seq)?;
        Wal::replay::<S::Op>(&wal_path, |seq, op| {
            let already_captured = matches!(snapshot_seq, Some(snap) if seq <= snap);
            if !already_captured {
                state.apply(&op);
            }
        })?;

        Ok(Self {
            wal: RwLock::new(wal),
            state: RwLock::new(state),
            snapshot_path,
            appends_since_checkpoint: RwLock::new(0),
        })
    }

    /// Append an operation, apply it to the in-memory state, and return its
    /// WAL sequence number (used by the event store as the monotonic event id).
    pub fn append(&self, op: S::Op) -> Result<u64, StoreError> {
        self.append_with(|_seq| op)
    }

    /// Like [`Store::append`], but `build` sees the sequence number its
    /// returned op will be assigned before the op is journaled — the event
    /// store uses this to stamp `StoredEvent::id` with its own WAL sequence.
    pub fn append_with(&self, build: impl FnOnce(u64) -> S::Op) -> Result<u64, StoreError> {
        let mut wal = self.wal.write();
        let seq = wal.peek_next_seq();
        let op = build(seq);
        let assigned = wal.append(&op)?;
        drop(wal);
        self.state.write().apply(&op);

        let mut count = self.appends_since_checkpoint.write();
        *count += 1;
        if *count >= CHECKPOINT_INTERVAL {
            *count = 0;
            drop(count);
            self.checkpoint(assigned)?;
        }
        Ok(assigned)
    }

    /// Read-only access to the materialized state.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.read())
    }

    /// Force a snapshot at the given sequence and truncate the WAL.
    pub fn checkpoint(&self, seq: u64) -> Result<(), StoreError> {
        let snapshot = self.state.read().clone();
        crate::snapshot::save(&self.snapshot_path, seq, &snapshot)?;
        self.wal.write().truncate_after_checkpoint()?;
        Ok(())
    }
}
