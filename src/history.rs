//! The run log (persisted result store).
//!
//! One line per executed test: a status marker, one space, the test path.
//! Markers are `p` passed, `f` failed, `s` skipped, `w` warned; lines with
//! any other marker are reserved and ignored on load. The `f` lines drive
//! the `failed` replay directive, and the whole mapping feeds regression and
//! fix detection on the next run.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::case::{Outcome, Test};
use crate::errors::GauntletError;

/// The last recorded outcome per test identifier.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    outcomes: BTreeMap<Test, Outcome>,
}

impl RunLog {
    /// A log with no recorded outcomes, as before the first run.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (Test, Outcome)>) -> Self {
        Self {
            outcomes: entries.into_iter().collect(),
        }
    }

    /// Reads the log at `path`. A missing file is an empty log; any other
    /// I/O failure is an error.
    pub fn load_or_empty(path: &Path) -> Result<Self, GauntletError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::empty()),
            Err(e) => {
                return Err(GauntletError::HistoryIo {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let mut outcomes = BTreeMap::new();
        for line in content.lines() {
            let Some((marker, rest)) = line.split_once(' ') else {
                continue;
            };
            let Some(marker) = marker.chars().next().filter(|_| marker.len() == 1) else {
                continue;
            };
            let Some(outcome) = Outcome::from_marker(marker) else {
                continue;
            };
            let path = rest.trim();
            if !path.is_empty() {
                outcomes.insert(Test::new(path), outcome);
            }
        }
        Self { outcomes }
    }

    /// The last recorded outcome for a test, if it was ever recorded.
    pub fn previous_outcome(&self, test: &Test) -> Option<Outcome> {
        self.outcomes.get(test).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Serializes `entries` to `path`, replacing the previous log as a
    /// whole-file swap (staged write, then rename).
    pub fn record<'t>(
        path: &Path,
        entries: impl IntoIterator<Item = (&'t Test, Outcome)>,
    ) -> Result<(), GauntletError> {
        let io_err = |e: io::Error| GauntletError::HistoryIo {
            path: path.display().to_string(),
            source: e,
        };

        let mut content = String::new();
        for (test, outcome) in entries {
            content.push(outcome.marker());
            content.push(' ');
            content.push_str(test.path());
            content.push('\n');
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let staged = path.with_extension("txt.tmp");
        fs::write(&staged, content).map_err(io_err)?;
        fs::rename(&staged, path).map_err(io_err)?;
        Ok(())
    }
}
