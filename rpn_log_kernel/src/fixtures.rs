/// Postfix log — Display Fixtures
///
/// Fixtures pair a token stream with the exact text display() must
/// produce. Shared by the harness binary and the golden tests.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::hashing::canonical_hash;
use crate::log::OrderedStringLog;

/// One fixture case as stored in the JSON fixture file.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub entries: Vec<String>,
    pub expected_output: String,
    #[serde(default)]
    pub expected_hash: Option<String>,
}

/// Outcome of checking one fixture.
#[derive(Debug, Clone)]
pub struct FixtureOutcome {
    pub name: String,
    pub output_match: bool,
    pub hash_match: bool,
    pub deterministic: bool,
    pub rendered: String,
    pub hash: String,
}

impl FixtureOutcome {
    pub fn passed(&self) -> bool {
        self.output_match && self.hash_match && self.deterministic
    }
}

impl Fixture {
    /// Build the log described by this fixture.
    pub fn build_log(&self) -> OrderedStringLog {
        self.entries.iter().cloned().collect()
    }

    /// Render twice, hash, and compare against expectations.
    pub fn check(&self) -> io::Result<FixtureOutcome> {
        let log = self.build_log();

        let mut first = Vec::new();
        log.display(&mut first)?;
        let mut second = Vec::new();
        log.display(&mut second)?;

        let rendered = String::from_utf8(first).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, e)
        })?;
        let hash = canonical_hash(&log);

        Ok(FixtureOutcome {
            name: self.name.clone(),
            output_match: rendered == self.expected_output,
            hash_match: self
                .expected_hash
                .as_deref()
                .map_or(true, |expected| expected == hash),
            deterministic: rendered.as_bytes() == second.as_slice(),
            rendered,
            hash,
        })
    }
}

/// Load a fixture file (a JSON array of fixtures).
pub fn load_fixtures(path: &Path) -> io::Result<Vec<Fixture>> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Bad fixture file {}: {}", path.display(), e),
        )
    })
}
