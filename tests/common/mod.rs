//! Shared fixtures for gauntlet integration tests.
//!
//! Each test builds its own repository under a tempdir so harness instances
//! with different roots can run in the same process.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use gauntlet::config::Config;
use tempfile::TempDir;

/// Config rooted inside `dir`, mirroring the default layout.
pub fn config_in(dir: &Path) -> Config {
    Config {
        test_root: dir.join("tests"),
        source_extension: ".src".to_string(),
        suite_dirs: vec![dir.join("suites")],
        last_run_file: dir.join("data/last-run.txt"),
        failing_file: dir.join("data/failing.txt"),
        checker: None,
    }
}

/// Creates `tests/<relative>` (and parents) with placeholder content.
pub fn add_test(dir: &Path, relative: &str) -> PathBuf {
    let path = dir.join("tests").join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "source\n").unwrap();
    path
}

/// A repository with tests spread across single- and multi-digit phases.
pub fn phase_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    for relative in [
        "phase1/check1/a.src",
        "phase1/check2/b.src",
        "phase5/check1/c.src",
        "phase9/check2/d.src",
        "phase10/check1/e.src",
        "phase20/check3/f.src",
        "phase21/check1/g.src",
        "misc/h.src",
    ] {
        add_test(dir.path(), relative);
    }
    // Non-source files are invisible to selection.
    fs::write(dir.path().join("tests/misc/notes.txt"), "notes\n").unwrap();
    dir
}
