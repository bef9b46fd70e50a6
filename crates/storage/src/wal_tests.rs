// SPDX-License-Identifier: MIT

use super::*;
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Op {
    value: i32,
}

#[test]
fn append_assigns_increasing_sequence_numbers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("x.wal");
    let mut wal = Wal::open(&path, 0).unwrap();
    let a = wal.append(&Op { value: 1 }).unwrap();
    let b = wal.append(&Op { value: 2 }).unwrap();
    assert_eq!(a, 0);
    assert_eq!(b, 1);
}

#[test]
fn replay_visits_entries_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("x.wal");
    let mut wal = Wal::open(&path, 0).unwrap();
    wal.append(&Op { value: 10 }).unwrap();
    wal.append(&Op { value: 20 }).unwrap();
    drop(wal);

    let mut seen = Vec::new();
    Wal::replay::<Op>(&path, |seq, op| seen.push((seq, op.value))).unwrap();
    assert_eq!(seen, vec![(0, 10), (1, 20)]);
}

#[test]
fn replay_of_missing_file_is_a_noop() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.wal");
    let mut seen = Vec::new();
    Wal::replay::<Op>(&path, |seq, op| seen.push((seq, op.value))).unwrap();
    assert!(seen.is_empty());
}

#[test]
fn truncated_tail_line_is_skipped_not_fatal() {
    use std::io::Write;
    let dir = tempdir().unwrap();
    let path = dir.path().join("x.wal");
    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&Op { value: 1 }).unwrap();
    }
    // Simulate a crash mid-write: append a partial, non-JSON line.
    {
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(f, "{{\"seq\":1,\"op\":{{\"valu").unwrap();
    }
    let mut seen = Vec::new();
    Wal::replay::<Op>(&path, |seq, op| seen.push((seq, op.value))).unwrap();
    assert_eq!(seen, vec![(0, 1)]);
}

#[test]
fn min_next_seq_prevents_reuse_after_checkpoint_truncation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("x.wal");
    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&Op { value: 1 }).unwrap();
        wal.append(&Op { value: 2 }).unwrap();
        wal.truncate_after_checkpoint().unwrap();
    }
    // A fresh handle with no knowledge of prior appends must be told the
    // floor explicitly — that's what the store layer's min_next_seq does.
    let mut wal = Wal::open(&path, 2).unwrap();
    let seq = wal.append(&Op { value: 3 }).unwrap();
    assert_eq!(seq, 2);
}
