#![forbid(unsafe_code)]

/// Canonical log format v1. Changing the hashed layout requires v2.
pub const LOG_FORMAT_VERSION: u32 = 1;

pub mod log;
pub mod hashing;
pub mod fixtures;

pub use log::{OrderedStringLog, BANNER};
