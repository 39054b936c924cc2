/// Postfix token log — ordered, append-only.
///
/// Entries are pure text. The log performs no parsing, no evaluation
/// and no normalization: what is appended is what is displayed.
///
/// Rules:
///   - Strict append only — no removal, no mutation, no reordering
///   - Duplicates and empty entries are kept as-is
///   - display() never mutates and is repeatable

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// Header line written before the entries on every display.
/// Consumers match on this literal; it must not change.
pub const BANNER: &str = "---MOSTRANDO POLACA INVERSA------";

/// Insertion-ordered log of postfix tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedStringLog {
    entries: Vec<String>,
}

impl OrderedStringLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a single entry at the end of the log.
    pub fn append(&mut self, value: impl Into<String>) {
        self.entries.push(value.into());
    }

    /// Write the banner, then every entry on its own line, to `out`.
    ///
    /// Sink failures are returned unchanged; the log is never touched.
    pub fn display<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        tracing::debug!(entries = self.entries.len(), "displaying postfix log");
        writeln!(out, "{}", BANNER)?;
        for entry in &self.entries {
            writeln!(out, "{}", entry)?;
        }
        out.flush()
    }

    /// Display onto the process standard output.
    pub fn display_stdout(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.display(&mut handle)
    }

    /// The exact text display() would write.
    pub fn render(&self) -> String {
        let mut buf: Vec<u8> = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.display(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.entries.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedStringLog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for OrderedStringLog {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.entries.extend(iter.into_iter().map(Into::into));
    }
}

impl<'a> IntoIterator for &'a OrderedStringLog {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
