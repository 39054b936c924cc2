//! Session manager — isolated logs with persist-then-append semantics.
//!
//! Each session gets its own directory with an entry log and snapshots.
//! Concurrency: Mutex for write serialization, no global mutable state.
//!
//! Append order:
//!   1. entry_store.append_entry() — may fail on I/O
//!   2. log.append()               — only if step 1 succeeded
//!   3. snapshot if interval reached; failure is logged, not returned

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rpn_log_kernel::hashing::canonical_hash;
use rpn_log_kernel::OrderedStringLog;

use crate::config::SessionConfig;
use crate::entry_store::EntryStore;
use crate::error::{Result, RuntimeError};
use crate::proto_bridge::{entry_to_proto, proto_to_value};
use crate::proto_types::ProtoEntry;
use crate::replay;
use crate::snapshot;

/// An isolated postfix log with its own entry file and snapshots.
pub struct LogSession {
    session_id: String,
    session_dir: PathBuf,
    log: OrderedStringLog,
    entry_store: EntryStore,
    config: SessionConfig,
}

impl LogSession {
    /// Open (or create) a session in the given base directory.
    ///
    /// Directory structure:
    ///   <base_dir>/<session_id>/entries.log
    ///   <base_dir>/<session_id>/snapshots/
    pub fn open(base_dir: &Path, session_id: &str, config: SessionConfig) -> Result<Self> {
        let session_dir = base_dir.join(session_id);
        let entry_store =
            EntryStore::open(&session_dir.join("entries.log"))?.with_fsync(config.fsync);

        let stored = entry_store.load_all_entries()?;
        check_sequences(&stored)?;

        let mut log = seed_from_snapshot(&session_dir.join("snapshots"), &stored);
        let resume_from = log.len();
        log.extend(stored[resume_from..].iter().map(proto_to_value));

        tracing::info!(
            session_id,
            entries = log.len(),
            from_snapshot = resume_from,
            "session opened"
        );

        Ok(Self {
            session_id: session_id.to_string(),
            session_dir,
            log,
            entry_store,
            config,
        })
    }

    /// Persist one entry, then append it to the in-memory log.
    ///
    /// Returns the sequence number assigned to the entry.
    pub fn append(&mut self, value: impl Into<String>) -> Result<u64> {
        let value = value.into();
        let sequence = self.entry_store.last_sequence() + 1;

        self.entry_store
            .append_entry(&entry_to_proto(sequence, &value))?;
        self.log.append(value);

        // The entry is committed; a snapshot can always be rebuilt later.
        if self.config.snapshot_interval > 0 && sequence % self.config.snapshot_interval == 0 {
            if let Err(e) = snapshot::save_snapshot(&self.snapshots_dir(), &self.log) {
                tracing::warn!(sequence, "snapshot failed: {}", e);
            }
        }

        Ok(sequence)
    }

    /// Full replay from the entry file, replacing the in-memory log.
    pub fn replay_full(&mut self) -> Result<(OrderedStringLog, String)> {
        let stored = self.entry_store.load_all_entries()?;
        check_sequences(&stored)?;
        let values: Vec<String> = stored.iter().map(proto_to_value).collect();

        let (log, hash) = replay::rebuild_log(&values);
        self.log = log.clone();

        Ok((log, hash))
    }

    /// Display the session's log onto `out`.
    pub fn display<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        self.log.display(out)?;
        Ok(())
    }

    pub fn log(&self) -> &OrderedStringLog {
        &self.log
    }

    pub fn current_hash(&self) -> String {
        canonical_hash(&self.log)
    }

    pub fn current_sequence(&self) -> u64 {
        self.entry_store.last_sequence()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.session_dir.join("snapshots")
    }
}

/// Stored entry N must carry sequence N.
fn check_sequences(stored: &[ProtoEntry]) -> Result<()> {
    for (entry, expected) in stored.iter().zip(1u64..) {
        if entry.sequence != expected {
            return Err(RuntimeError::SequenceViolation {
                expected,
                got: entry.sequence,
            });
        }
    }
    Ok(())
}

/// Restore the latest snapshot that agrees with the stored entries.
/// Falls back to an empty log (full replay) when none does.
fn seed_from_snapshot(dir: &Path, stored: &[ProtoEntry]) -> OrderedStringLog {
    let snap = match snapshot::load_latest_snapshot(dir) {
        Ok(Some(snap)) => snap,
        Ok(None) => return OrderedStringLog::new(),
        Err(e) => {
            tracing::warn!("ignoring unreadable snapshot: {}", e);
            return OrderedStringLog::new();
        }
    };

    match snapshot::restore_snapshot(&snap) {
        Ok(log) if log.len() <= stored.len()
            && log.iter().zip(stored).all(|(v, e)| *v == e.value) =>
        {
            log
        }
        Ok(_) => {
            tracing::warn!(
                sequence = snap.sequence,
                "snapshot disagrees with entry log; replaying from scratch"
            );
            OrderedStringLog::new()
        }
        Err(e) => {
            tracing::warn!(sequence = snap.sequence, "snapshot rejected: {}", e);
            OrderedStringLog::new()
        }
    }
}

/// Thread-safe session handle using Mutex.
pub struct SharedLog {
    inner: Mutex<LogSession>,
}

impl SharedLog {
    pub fn new(session: LogSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LogSession>> {
        self.inner.lock().map_err(|_| RuntimeError::LockPoisoned)
    }

    /// Append under lock.
    pub fn append(&self, value: impl Into<String>) -> Result<u64> {
        self.lock()?.append(value)
    }

    /// Display under lock; no append interleaves with the output.
    pub fn display<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        self.lock()?.display(out)
    }

    pub fn current_hash(&self) -> Result<String> {
        Ok(self.lock()?.current_hash())
    }

    pub fn current_sequence(&self) -> Result<u64> {
        Ok(self.lock()?.current_sequence())
    }

    /// Copy of the current log.
    pub fn snapshot_log(&self) -> Result<OrderedStringLog> {
        Ok(self.lock()?.log().clone())
    }

    pub fn into_inner(self) -> Result<LogSession> {
        self.inner.into_inner().map_err(|_| RuntimeError::LockPoisoned)
    }
}
