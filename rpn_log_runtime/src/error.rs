//! Runtime error type.
//!
//! The kernel itself never fails on append; everything here comes from
//! disk, snapshot content, or lock state.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("sequence violation: expected {expected}, got {got}")]
    SequenceViolation { expected: u64, got: u64 },

    #[error("bad snapshot: {0}")]
    Snapshot(String),

    #[error("hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("bad config: {0}")]
    Config(String),

    #[error("session lock poisoned")]
    LockPoisoned,
}
