//! Harness configuration.
//!
//! Everything path- or format-shaped that the selector, stores, and shipped
//! comparison routine need lives in one explicit [`Config`] value that is
//! passed by reference into constructors. There is no process-wide config
//! singleton, so harness instances with different roots can coexist in one
//! process (the crate's own tests rely on this).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::GauntletError;

/// Well-known config filename probed by the CLI when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "gauntlet.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory containing the test repository.
    pub test_root: PathBuf,
    /// Extension of test source files, with the leading dot.
    pub source_extension: String,
    /// Suite search path. Lookups probe in order; saves go to the first.
    pub suite_dirs: Vec<PathBuf>,
    /// Location of the last-run log.
    pub last_run_file: PathBuf,
    /// Suite file consulted by the `failing` directive.
    pub failing_file: PathBuf,
    /// Checker invocation for the shipped comparison routine. Occurrences of
    /// `{test}` are replaced with the test's source file path.
    pub checker: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            test_root: PathBuf::from("tests"),
            source_extension: ".src".to_string(),
            suite_dirs: vec![PathBuf::from("suites")],
            last_run_file: PathBuf::from("data/last-run.txt"),
            failing_file: PathBuf::from("data/failing.txt"),
            checker: None,
        }
    }
}

impl Config {
    /// Reads a config file, failing if it is missing or not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, GauntletError> {
        let content = std::fs::read_to_string(path).map_err(|e| GauntletError::ConfigLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| GauntletError::ConfigLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Reads a config file if one exists at `path`, otherwise falls back to
    /// the defaults. A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, GauntletError> {
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
