// SPDX-License-Identifier: MIT

//! Write-ahead log: a newline-delimited JSON journal of typed operations.
//!
//! Each line is `{"seq": <u64>, "op": <Op>}`. Opening a WAL acquires an
//! advisory exclusive lock on the file (via `fs2`), retrying for at least
//! [`BUSY_TIMEOUT`] before giving up, so a second writer process opening the
//! same store fails fast with a clear error rather than corrupting the file.
//! Read-only openers (the out-of-scope dashboard, tests inspecting state)
//! never take the writer's path — they go through [`Wal::replay`] instead.

use crate::error::StoreError;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Minimum time to retry acquiring the writer lock before failing, per
/// spec.md §4.1's "long (>= 5s) busy timeout to tolerate concurrent
/// read-only openers".
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// One journal entry on disk.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct WalLine<Op> {
    seq: u64,
    op: Op,
}

pub struct Wal {
    path: PathBuf,
    file: File,
    next_seq: u64,
}

impl Wal {
    /// Open (creating if absent) the WAL file at `path`, acquiring the
    /// single-writer lock. `IF NOT EXISTS`-style idempotent: opening an
    /// already-current file just positions at the end.
    ///
    /// `min_next_seq` is the smallest sequence number this WAL is allowed to
    /// assign next — the caller (a [`crate::store::Store`]) derives this from
    /// its latest snapshot so sequence numbers stay monotonic across a
    /// checkpoint-then-truncate even after the process restarts and the
    /// truncated WAL alone has no memory of what came before.
    pub fn open(path: &Path, min_next_seq: u64) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;

        Self::acquire_lock(&file, path)?;

        let scanned_next_seq = Self::scan_max_seq(path)?.map(|s| s + 1).unwrap_or(0);
        let next_seq = scanned_next_seq.max(min_next_seq);
        Ok(Self { path: path.to_path_buf(), file, next_seq })
    }

    fn acquire_lock(file: &File, path: &Path) -> Result<(), StoreError> {
        let deadline = Instant::now() + BUSY_TIMEOUT;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(()),
                Err(_) if Instant::now() < deadline => std::thread::sleep(Duration::from_millis(50)),
                Err(source) => {
                    return Err(StoreError::Io { path: path.to_path_buf(), source });
                }
            }
        }
    }

    /// Scan the file once to find the highest recorded sequence number,
    /// tolerating (and dropping) a truncated final line left by a crash
    /// mid-append, per spec.md §4.1's non-fatal-truncated-tail rule.
    fn scan_max_seq(path: &Path) -> Result<Option<u64>, StoreError> {
        let file = File::open(path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        let reader = BufReader::new(file);
        let mut max_seq = None;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<serde_json::Value>(&line) {
                Ok(v) => {
                    if let Some(seq) = v.get("seq").and_then(|s| s.as_u64()) {
                        max_seq = Some(max_seq.map_or(seq, |m: u64| m.max(seq)));
                    }
                }
                Err(_) => {
                    tracing::warn!(path = %path.display(), line_no, "dropping truncated/corrupt WAL tail line");
                }
            }
        }
        Ok(max_seq)
    }

    /// Replay every well-formed entry in the WAL, calling `apply` for each
    /// in sequence order. Malformed lines are skipped with a warning, never
    /// fatal — the same tolerance as `scan_max_seq`.
    pub fn replay<Op: DeserializeOwned>(path: &Path, mut apply: impl FnMut(u64, Op)) -> Result<(), StoreError> {
        if !path.exists() {
            return Ok(());
        }
        let file = File::open(path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        let reader = BufReader::new(file);
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<WalLine<Op>>(&line) {
                Ok(entry) => apply(entry.seq, entry.op),
                Err(e) => tracing::warn!(path = %path.display(), line_no, error = %e, "skipping unparseable WAL line"),
            }
        }
        Ok(())
    }

    /// Append one operation, returning its assigned sequence number.
    pub fn append<Op: Serialize>(&mut self, op: &Op) -> Result<u64, StoreError> {
        let seq = self.next_seq;
        let line = WalLine { seq, op };
        let mut json = serde_json::to_string(&line)?;
        json.push('\n');
        self.file.write_all(json.as_bytes()).map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        self.file.sync_data().map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        self.next_seq += 1;
        Ok(seq)
    }

    /// Truncate the journal after a snapshot has captured everything up to
    /// and including `seq`. Subsequent `next_seq` values continue unbroken.
    pub fn truncate_after_checkpoint(&mut self) -> Result<(), StoreError> {
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        Self::acquire_lock(&self.file, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The sequence number the next [`Wal::append`] will assign, without
    /// consuming it. Lets a caller build an `Op` that embeds its own
    /// about-to-be-assigned sequence number (the event store's public id).
    pub fn peek_next_seq(&self) -> u64 {
        self.next_seq
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
