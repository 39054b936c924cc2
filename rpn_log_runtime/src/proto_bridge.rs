//! Proto ↔ Kernel conversion bridge.
//!
//! Sequence numbers exist only on disk; the kernel log is positional.
//! Entry N of a log is stored with sequence N (1-based).

use rpn_log_kernel::OrderedStringLog;

use crate::proto_types::ProtoEntry;

pub fn entry_to_proto(sequence: u64, value: &str) -> ProtoEntry {
    ProtoEntry {
        sequence,
        value: value.to_string(),
    }
}

pub fn proto_to_value(proto: &ProtoEntry) -> String {
    proto.value.clone()
}

/// Number every entry of a log from 1, in insertion order.
pub fn log_to_protos(log: &OrderedStringLog) -> Vec<ProtoEntry> {
    log.iter()
        .zip(1u64..)
        .map(|(value, seq)| entry_to_proto(seq, value))
        .collect()
}
