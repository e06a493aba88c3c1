//! Defines the command-line arguments and subcommands for the gauntlet CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure. Directive and
//! option names map to handler values through explicit matches; nothing is
//! looked up by reflection.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::case::Outcome;
use crate::compare::DiffMode;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "gauntlet",
    version,
    about = "A test-selection and regression harness for checker-style test repositories."
)]
pub struct GauntletArgs {
    /// Path to a config file (default: gauntlet.yaml when present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Save the executed test set as a named suite after the run.
    #[arg(long = "save", global = true, value_name = "NAME")]
    pub save_as: Option<String>,

    /// Allow --save to replace an existing suite file.
    #[arg(short = 'o', long, global = true)]
    pub overwrite: bool,

    /// Pause for confirmation after tests with these outcomes
    /// (passed, failed, skipped, warned). Repeatable.
    #[arg(long = "pause-on", global = true, value_name = "OUTCOME", value_parser = parse_outcome)]
    pub pause_on: Vec<Outcome>,

    /// Output comparison mode: text or exact.
    #[arg(long = "diff", global = true, value_name = "MODE", default_value = "text", value_parser = parse_diff_mode)]
    pub diff_mode: DiffMode,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all selection directives.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every test in the repository.
    All,
    /// Run all tests in a folder and its subfolders.
    Glob {
        /// Folder under the test root.
        #[arg(required = true)]
        folder: String,
    },
    /// Run any test whose path matches a glob pattern.
    Files {
        #[arg(required = true)]
        pattern: String,
    },
    /// Run a phase, optionally narrowed to one check.
    Phase {
        /// Phase number or range: `<#>` or `<from>-<to>`.
        #[arg(required = true)]
        spec: String,
        /// Check number or range.
        check: Option<String>,
    },
    /// Run one check across all phases.
    Check {
        /// Check number or range: `<#>` or `<from>-<to>`.
        #[arg(required = true)]
        spec: String,
    },
    /// Run a saved suite by name.
    Suite {
        #[arg(required = true)]
        name: String,
    },
    /// Re-run the tests that failed last time.
    Failed,
    /// Run the suite of currently failing tests.
    Failing {
        /// Explicit suite file to read instead of the configured one.
        file: Option<PathBuf>,
    },
    /// Read one test path per line from standard input.
    Pipe,
}

fn parse_outcome(value: &str) -> Result<Outcome, String> {
    match value {
        "passed" => Ok(Outcome::Passed),
        "failed" => Ok(Outcome::Failed),
        "skipped" => Ok(Outcome::Skipped),
        "warned" => Ok(Outcome::Warned),
        other => Err(format!(
            "unknown outcome `{other}` (expected passed, failed, skipped, or warned)"
        )),
    }
}

fn parse_diff_mode(value: &str) -> Result<DiffMode, String> {
    match value {
        "text" => Ok(DiffMode::Text),
        "exact" => Ok(DiffMode::Exact),
        other => Err(format!("unknown diff mode `{other}` (expected text or exact)")),
    }
}
