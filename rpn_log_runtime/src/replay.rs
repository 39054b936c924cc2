//! Replay — rebuild a log from stored entry values.

use rpn_log_kernel::hashing::canonical_hash;
use rpn_log_kernel::OrderedStringLog;

/// Rebuild a log by appending every value in order.
///
/// Returns (log, canonical_hash). Pure function of the input.
pub fn rebuild_log<S: AsRef<str>>(values: &[S]) -> (OrderedStringLog, String) {
    let mut log = OrderedStringLog::new();
    for value in values {
        log.append(value.as_ref());
    }
    let hash = canonical_hash(&log);
    (log, hash)
}

/// Rebuild and return only the canonical hash.
pub fn rebuild_hash<S: AsRef<str>>(values: &[S]) -> String {
    let (_, hash) = rebuild_log(values);
    hash
}
