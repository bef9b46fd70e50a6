// SPDX-License-Identifier: MIT

//! Point-in-time snapshots of materialized state, zstd-compressed, so
//! recovery doesn't have to replay an unbounded WAL from empty.

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const CURRENT_SNAPSHOT_VERSION: u32 = 1;
const MAX_BAK_FILES: u32 = 3;
const ZSTD_LEVEL: i32 = 3;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct SnapshotEnvelope<S> {
    v: u32,
    seq: u64,
    state: S,
}

/// Save `state` (materialized as of WAL sequence `seq`) to `path`,
/// rotating up to [`MAX_BAK_FILES`] prior snapshots out of the way first so
/// a crash mid-write never destroys the only durable copy.
pub fn save<S: Serialize>(path: &Path, seq: u64, state: &S) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    }
    if path.exists() {
        rotate_bak_path(path);
    }
    let envelope = SnapshotEnvelope { v: CURRENT_SNAPSHOT_VERSION, seq, state };
    let json = serde_json::to_vec(&envelope)?;
    let compressed =
        zstd::encode_all(json.as_slice(), ZSTD_LEVEL).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    let tmp_path = path.with_extension("snapshot.tmp");
    fs::write(&tmp_path, compressed).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    fs::rename(&tmp_path, path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    Ok(())
}

/// Load a snapshot, returning `None` if it doesn't exist yet (a brand-new store).
pub fn load<S: DeserializeOwned>(path: &Path) -> Result<Option<(u64, S)>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let compressed = fs::read(path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    let json = zstd::decode_all(compressed.as_slice())
        .map_err(|e| StoreError::Corrupt { path: path.to_path_buf(), reason: e.to_string() })?;
    let envelope: SnapshotEnvelope<S> = serde_json::from_slice(&json)?;
    if envelope.v != CURRENT_SNAPSHOT_VERSION {
        return Err(StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("unsupported snapshot version {} (expected {})", envelope.v, CURRENT_SNAPSHOT_VERSION),
        });
    }
    Ok(Some((envelope.seq, envelope.state)))
}

/// Pick the next `.bak`/`.bak.N` path, rotating older backups out. Keeps up
/// to [`MAX_BAK_FILES`] backups; the oldest is removed when the limit is hit.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| if n == 1 { path.with_extension("bak") } else { path.with_extension(format!("bak.{n}")) };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    let dest = bak(1);
    let _ = fs::copy(path, &dest);
    dest
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.snapshot");
        let mut state = HashMap::new();
        state.insert("a".to_string(), 1u32);
        save(&path, 42, &state).unwrap();
        let (seq, loaded): (u64, HashMap<String, u32>) = load(&path).unwrap().unwrap();
        assert_eq!(seq, 42);
        assert_eq!(loaded, state);
    }

    #[test]
    fn load_missing_file_returns_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.snapshot");
        let loaded: Option<(u64, HashMap<String, u32>)> = load(&path).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn second_save_rotates_a_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.snapshot");
        save(&path, 1, &1u32).unwrap();
        save(&path, 2, &2u32).unwrap();
        assert!(path.with_extension("bak").exists());
    }
}
