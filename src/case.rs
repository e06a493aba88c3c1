//! Test identity and outcome classification.

use std::fmt;
use std::path::PathBuf;

use crate::config::Config;

/// One test case, identified by its source path relative to the test root.
///
/// Paths are normalized to forward slashes so identifiers compare, sort, and
/// round-trip through suite files and the run log identically on every
/// platform. A `Test` is immutable once constructed; the harness only ever
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Test {
    path: String,
}

impl Test {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into().trim().replace('\\', "/");
        Self { path }
    }

    /// The normalized, slash-separated identifier.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Absolute-ish location of the test source under the configured root.
    pub fn source_file(&self, config: &Config) -> PathBuf {
        config.test_root.join(&self.path)
    }

    /// Sibling file holding the expected checker output.
    pub fn expected_file(&self, config: &Config) -> PathBuf {
        self.source_file(config).with_extension("expected")
    }
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Classification of one test's result for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
    Warned,
}

impl Outcome {
    /// Single-character marker used in the run log: `p`, `f`, `s`, `w`.
    pub fn marker(self) -> char {
        match self {
            Outcome::Passed => 'p',
            Outcome::Failed => 'f',
            Outcome::Skipped => 's',
            Outcome::Warned => 'w',
        }
    }

    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'p' => Some(Outcome::Passed),
            'f' => Some(Outcome::Failed),
            's' => Some(Outcome::Skipped),
            'w' => Some(Outcome::Warned),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Skipped => "skipped",
            Outcome::Warned => "warned",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
