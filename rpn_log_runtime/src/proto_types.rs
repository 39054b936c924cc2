//! Hand-written protobuf types for the entry log.
//!
//! Uses prost derive macros for encode/decode without prost-build.

use prost::Message;

/// One stored log entry.
#[derive(Clone, PartialEq, Message)]
pub struct ProtoEntry {
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    #[prost(string, tag = "2")]
    pub value: String,
}
