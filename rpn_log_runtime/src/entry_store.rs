//! Entry file — length-prefixed protobuf frames, append only.
//!
//!   [u32 LE length][ProtoEntry bytes][u32 LE length][ProtoEntry bytes]...
//!
//! The store tracks `end`, the byte offset just past the last complete
//! frame. Appends only ever land at `end`.
//!
//! A torn tail (a frame cut short by a crash or a failed write) is cut
//! off when the store is opened. A torn tail found later, by
//! `load_all_entries`, is reported as `InvalidData`.

use std::fs::{self, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use prost::Message;

use crate::proto_types::ProtoEntry;

const LEN_PREFIX: usize = 4;
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Result of walking the frames of an entry file.
struct FrameScan {
    entries: Vec<ProtoEntry>,
    /// Offset just past the last complete frame.
    end: u64,
    /// Bytes after `end` that do not form a complete frame.
    torn: u64,
}

fn invalid_data(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

fn scan_frames(buf: &[u8]) -> io::Result<FrameScan> {
    let mut entries = Vec::new();
    let mut pos = 0usize;

    while pos < buf.len() {
        let rest = &buf[pos..];
        if rest.len() < LEN_PREFIX {
            break;
        }

        let mut len_bytes = [0u8; LEN_PREFIX];
        len_bytes.copy_from_slice(&rest[..LEN_PREFIX]);
        let len = u32::from_le_bytes(len_bytes) as usize;
        // Sequences start at 1, so a valid frame is never empty.
        if len == 0 || len > MAX_FRAME_LEN {
            return Err(invalid_data(format!(
                "invalid frame length {} at offset {}",
                len, pos
            )));
        }
        if rest.len() - LEN_PREFIX < len {
            break;
        }

        let payload = &rest[LEN_PREFIX..LEN_PREFIX + len];
        let entry = ProtoEntry::decode(payload).map_err(|e| {
            invalid_data(format!("undecodable frame at offset {}: {}", pos, e))
        })?;
        entries.push(entry);
        pos += LEN_PREFIX + len;
    }

    Ok(FrameScan {
        entries,
        end: pos as u64,
        torn: (buf.len() - pos) as u64,
    })
}

fn read_file(path: &Path) -> io::Result<Vec<u8>> {
    match fs::read(path) {
        Ok(buf) => Ok(buf),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Append-only entry file.
pub struct EntryStore {
    path: PathBuf,
    last_sequence: u64,
    end: u64,
    repaired_bytes: u64,
    fsync: bool,
}

impl EntryStore {
    /// Open or create the entry file at `path`, cutting off a torn tail.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let scan = scan_frames(&read_file(path)?)?;
        if scan.torn > 0 {
            tracing::warn!(
                path = %path.display(),
                offset = scan.end,
                bytes = scan.torn,
                "cutting torn tail off entry file"
            );
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(scan.end)?;
            file.sync_all()?;
        }

        let last_sequence = scan.entries.last().map_or(0, |e| e.sequence);
        tracing::debug!(path = %path.display(), last_sequence, end = scan.end, "opened entry store");

        Ok(Self {
            path: path.to_path_buf(),
            last_sequence,
            end: scan.end,
            repaired_bytes: scan.torn,
            fsync: true,
        })
    }

    pub fn with_fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    /// Append one entry; its sequence must be `last_sequence() + 1`.
    ///
    /// On a failed write the file is cut back to the previous end, so a
    /// retry never lands behind a partial frame.
    pub fn append_entry(&mut self, entry: &ProtoEntry) -> io::Result<()> {
        let expected = self.last_sequence + 1;
        if entry.sequence != expected {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "sequence violation in entry store: expected {}, got {}",
                    expected, entry.sequence
                ),
            ));
        }

        let payload = entry.encode_to_vec();
        let mut frame = Vec::with_capacity(LEN_PREFIX + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&payload);

        let mut file = OpenOptions::new().create(true).write(true).open(&self.path)?;
        let on_disk = file.metadata()?.len();
        if on_disk != self.end {
            return Err(invalid_data(format!(
                "entry file is {} bytes, expected {}; reopen the store",
                on_disk, self.end
            )));
        }

        let written = file
            .seek(SeekFrom::Start(self.end))
            .and_then(|_| file.write_all(&frame))
            .and_then(|_| if self.fsync { file.sync_all() } else { Ok(()) });
        if let Err(e) = written {
            if let Err(cut) = file.set_len(self.end) {
                tracing::warn!("could not cut back partial frame: {}", cut);
            }
            return Err(e);
        }

        self.end += frame.len() as u64;
        self.last_sequence = entry.sequence;
        Ok(())
    }

    /// Read every entry in file order. Any torn frame is an error here.
    pub fn load_all_entries(&self) -> io::Result<Vec<ProtoEntry>> {
        let scan = scan_frames(&read_file(&self.path)?)?;
        if scan.torn > 0 {
            return Err(invalid_data(format!(
                "torn frame at offset {} ({} trailing bytes)",
                scan.end, scan.torn
            )));
        }
        Ok(scan.entries)
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Byte offset just past the last complete frame.
    pub fn end_offset(&self) -> u64 {
        self.end
    }

    /// Bytes cut off as a torn tail when the store was opened.
    pub fn repaired_bytes(&self) -> u64 {
        self.repaired_bytes
    }
}
