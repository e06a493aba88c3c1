//! Suite persistence.
//!
//! A suite is a named, ordered list of test paths stored one per line at
//! `<suite_dir>/<name>.txt`. Lookups probe the configured search path in
//! order; saves always target the first directory. Saving over an existing
//! file is refused unless explicitly forced, and the refusal is a reported
//! value rather than an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::case::Test;
use crate::config::Config;
use crate::errors::GauntletError;

/// A named, ordered sequence of tests with its backing file.
#[derive(Debug, Clone)]
pub struct Suite {
    pub name: String,
    pub filename: PathBuf,
    pub tests: Vec<Test>,
}

/// What a save attempt did.
#[derive(Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The file already exists and `overwrite` was false; nothing changed.
    AlreadyExists(PathBuf),
}

pub struct SuiteStore<'a> {
    config: &'a Config,
}

impl<'a> SuiteStore<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Loads a named suite from the first search directory that has it.
    pub fn load(&self, name: &str) -> Result<Suite, GauntletError> {
        for dir in &self.config.suite_dirs {
            let path = dir.join(format!("{name}.txt"));
            if path.is_file() {
                return read_suite(name, &path);
            }
        }
        // Report the primary location so the user can cross-check.
        let attempted = self
            .config
            .suite_dirs
            .first()
            .map(|d| d.join(format!("{name}.txt")))
            .unwrap_or_else(|| PathBuf::from(format!("{name}.txt")));
        Err(GauntletError::SuiteLoad {
            filename: attempted.display().to_string(),
            source: None,
        })
    }

    /// Loads a suite from an explicit file, bypassing name resolution.
    pub fn load_from_file(&self, path: &Path) -> Result<Suite, GauntletError> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        read_suite(&name, path)
    }

    /// Writes `tests` in order to the suite file for `name`. With
    /// `overwrite` false an existing file is left untouched and the conflict
    /// is reported; repeated calls are idempotent.
    pub fn save(
        &self,
        name: &str,
        tests: &[Test],
        overwrite: bool,
    ) -> Result<SaveOutcome, GauntletError> {
        let dir = self
            .config
            .suite_dirs
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("."));
        let path = dir.join(format!("{name}.txt"));

        if path.exists() && !overwrite {
            return Ok(SaveOutcome::AlreadyExists(path));
        }

        let save_err = |e: io::Error| GauntletError::SuiteSave {
            filename: path.display().to_string(),
            source: e,
        };

        fs::create_dir_all(&dir).map_err(save_err)?;
        let mut content = String::new();
        for test in tests {
            content.push_str(test.path());
            content.push('\n');
        }
        // Whole-file replace: stage next to the target, then rename over it.
        let staged = path.with_extension("txt.tmp");
        fs::write(&staged, content).map_err(save_err)?;
        fs::rename(&staged, &path).map_err(save_err)?;
        Ok(SaveOutcome::Saved(path))
    }
}

fn read_suite(name: &str, path: &Path) -> Result<Suite, GauntletError> {
    let content = fs::read_to_string(path).map_err(|e| GauntletError::SuiteLoad {
        filename: path.display().to_string(),
        source: Some(e),
    })?;
    let tests = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(Test::new)
        .collect();
    Ok(Suite {
        name: name.to_string(),
        filename: path.to_path_buf(),
        tests,
    })
}
