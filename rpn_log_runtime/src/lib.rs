#![forbid(unsafe_code)]

//! Postfix log — Rust Runtime
//!
//! Wraps the log kernel with persistence, replay, snapshots,
//! session management, and drift detection.
//!
//! No display logic lives here — rendering is delegated to the kernel.

pub mod error;
pub mod config;
pub mod proto_types;
pub mod proto_bridge;
pub mod entry_store;
pub mod replay;
pub mod snapshot;
pub mod session;
pub mod drift;

pub use error::{Result, RuntimeError};
