/// Postfix log — Canonical Hashing
///
/// Deterministic canonical serialization + SHA-256 hashing.
/// Produces byte-identical output across platforms.
///
/// Rules:
///   - Entries kept in insertion order (never sorted)
///   - Field order: format_version, entries
///   - UTF-8 JSON, no whitespace, no platform newline

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::log::OrderedStringLog;
use crate::LOG_FORMAT_VERSION;

/// Canonical serialization of a log to UTF-8 JSON bytes.
pub fn canonical_serialize(log: &OrderedStringLog) -> Vec<u8> {
    build_canonical_value(log).to_string().into_bytes()
}

/// SHA-256 of canonical serialization. Lowercase hex string.
pub fn canonical_hash(log: &OrderedStringLog) -> String {
    hex_digest(&canonical_serialize(log))
}

/// Lowercase hex SHA-256 of arbitrary bytes.
pub fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn build_canonical_value(log: &OrderedStringLog) -> Value {
    let mut root = Map::new();
    root.insert(
        "format_version".to_string(),
        Value::from(LOG_FORMAT_VERSION),
    );
    root.insert(
        "entries".to_string(),
        Value::Array(log.iter().cloned().map(Value::String).collect()),
    );
    Value::Object(root)
}
