//! Drift detection — determinism verification and log comparison.

use rpn_log_kernel::hashing::canonical_hash;
use rpn_log_kernel::OrderedStringLog;

use crate::error::{Result, RuntimeError};
use crate::replay;

/// Replay the same values twice and require identical hashes.
///
/// Returns the agreed hash.
pub fn verify_determinism<S: AsRef<str>>(values: &[S]) -> Result<String> {
    let (_, first) = replay::rebuild_log(values);
    let (_, second) = replay::rebuild_log(values);

    if first != second {
        return Err(RuntimeError::HashMismatch {
            expected: first,
            actual: second,
        });
    }
    Ok(first)
}

/// Structured comparison of two logs, `a` being the older one.
pub fn compare_logs(log_a: &OrderedStringLog, log_b: &OrderedStringLog) -> DriftReport {
    let common_prefix = log_a
        .iter()
        .zip(log_b.iter())
        .take_while(|(x, y)| x == y)
        .count();

    let shorter = log_a.len().min(log_b.len());
    let first_divergence = (common_prefix < shorter).then_some(common_prefix);

    // Only meaningful when b is an append-only continuation of a.
    let appended = if common_prefix == log_a.len() {
        log_b.entries()[common_prefix..].to_vec()
    } else {
        Vec::new()
    };

    DriftReport {
        len_a: log_a.len() as i64,
        len_b: log_b.len() as i64,
        len_delta: log_b.len() as i64 - log_a.len() as i64,
        common_prefix,
        b_extends_a: common_prefix == log_a.len(),
        first_divergence,
        appended,
        hash_a: canonical_hash(log_a),
        hash_b: canonical_hash(log_b),
    }
}

/// Structured drift report between two logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftReport {
    pub len_a: i64,
    pub len_b: i64,
    pub len_delta: i64,
    pub common_prefix: usize,
    /// `a` is a prefix of `b` (includes `a == b`).
    pub b_extends_a: bool,
    /// Index of the first differing entry, when both logs have one there.
    pub first_divergence: Option<usize>,
    /// Entries of `b` past the end of `a`; empty unless `b_extends_a`.
    pub appended: Vec<String>,
    pub hash_a: String,
    pub hash_b: String,
}

impl DriftReport {
    pub fn identical(&self) -> bool {
        self.hash_a == self.hash_b
    }
}
