//! Session configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, RuntimeError};

/// Settings for a [`LogSession`](crate::session::LogSession).
///
/// Missing fields fall back to [`SessionConfig::default`], so `{}` is a
/// valid config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Take a snapshot every N entries. `0` disables snapshots.
    pub snapshot_interval: u64,
    /// fsync the entry log after every append.
    pub fsync: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            snapshot_interval: 0,
            fsync: true,
        }
    }
}

impl SessionConfig {
    pub fn with_snapshot_interval(mut self, interval: u64) -> Self {
        self.snapshot_interval = interval;
        self
    }

    pub fn with_fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| RuntimeError::Config(e.to_string()))
    }
}
