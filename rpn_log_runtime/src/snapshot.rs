//! Snapshot layer — deterministic log snapshots.
//!
//! Snapshots contain canonical JSON + hash for verification.
//! No timestamps in snapshot content (determinism).
//!
//! If a snapshot's hash doesn't match its content, restore refuses it
//! and the caller falls back to full replay.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rpn_log_kernel::hashing::{canonical_hash, canonical_serialize, hex_digest};
use rpn_log_kernel::{OrderedStringLog, LOG_FORMAT_VERSION};

use crate::error::{Result, RuntimeError};

/// Snapshot on-disk format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of entries covered (= sequence of the last entry).
    pub sequence: u64,
    /// Canonical JSON of the log (UTF-8).
    pub canonical_json: String,
    /// SHA-256 of the canonical JSON.
    pub hash: String,
    /// Log format version at snapshot time.
    pub format_version: u32,
}

fn snapshot_path(dir: &Path, sequence: u64) -> PathBuf {
    dir.join(format!("snapshot_{:06}.json", sequence))
}

/// Save a deterministic snapshot of the whole log.
pub fn save_snapshot(dir: &Path, log: &OrderedStringLog) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let canonical_json = String::from_utf8(canonical_serialize(log))
        .map_err(|e| RuntimeError::Snapshot(e.to_string()))?;
    let snap = Snapshot {
        sequence: log.len() as u64,
        canonical_json,
        hash: canonical_hash(log),
        format_version: LOG_FORMAT_VERSION,
    };

    let path = snapshot_path(dir, snap.sequence);
    let content =
        serde_json::to_string(&snap).map_err(|e| RuntimeError::Snapshot(e.to_string()))?;

    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    tracing::info!(sequence = snap.sequence, path = %path.display(), "snapshot saved");
    Ok(path)
}

/// Load a snapshot at a specific sequence number.
/// Returns None if no snapshot exists at that sequence.
pub fn load_snapshot(dir: &Path, sequence: u64) -> Result<Option<Snapshot>> {
    let path = snapshot_path(dir, sequence);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let snap: Snapshot = serde_json::from_str(&content)
        .map_err(|e| RuntimeError::Snapshot(format!("{}: {}", path.display(), e)))?;
    Ok(Some(snap))
}

/// Load the latest snapshot in a directory.
/// Scans for snapshot_NNNNNN.json files and returns the highest sequence.
pub fn load_latest_snapshot(dir: &Path) -> Result<Option<Snapshot>> {
    if !dir.exists() {
        return Ok(None);
    }

    let mut best_seq: Option<u64> = None;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let seq = name
            .to_str()
            .and_then(|s| s.strip_prefix("snapshot_"))
            .and_then(|s| s.strip_suffix(".json"))
            .and_then(|s| s.parse::<u64>().ok());
        if let Some(seq) = seq {
            best_seq = Some(best_seq.map_or(seq, |best| best.max(seq)));
        }
    }

    match best_seq {
        Some(seq) => load_snapshot(dir, seq),
        None => Ok(None),
    }
}

/// Verify a snapshot's internal hash consistency.
pub fn verify_snapshot_hash(snap: &Snapshot) -> bool {
    hex_digest(snap.canonical_json.as_bytes()) == snap.hash
}

/// Decode a snapshot back into a log.
///
/// Rejects: hash mismatch, unknown format version, malformed canonical
/// JSON, and an entry count that disagrees with `sequence`.
pub fn restore_snapshot(snap: &Snapshot) -> Result<OrderedStringLog> {
    let actual = hex_digest(snap.canonical_json.as_bytes());
    if actual != snap.hash {
        return Err(RuntimeError::HashMismatch {
            expected: snap.hash.clone(),
            actual,
        });
    }
    if snap.format_version != LOG_FORMAT_VERSION {
        return Err(RuntimeError::Snapshot(format!(
            "unsupported format version {}",
            snap.format_version
        )));
    }

    let value: Value = serde_json::from_str(&snap.canonical_json)
        .map_err(|e| RuntimeError::Snapshot(e.to_string()))?;
    let entries = value
        .get("entries")
        .cloned()
        .ok_or_else(|| RuntimeError::Snapshot("missing entries".to_string()))?;
    let log: OrderedStringLog =
        serde_json::from_value(entries).map_err(|e| RuntimeError::Snapshot(e.to_string()))?;

    if log.len() as u64 != snap.sequence {
        return Err(RuntimeError::Snapshot(format!(
            "sequence {} but {} entries",
            snap.sequence,
            log.len()
        )));
    }
    Ok(log)
}
