//! The gauntlet command-line interface.
//!
//! This module is the entry point for all CLI directives. It resolves the
//! selection through the core library, runs the harness, and is the single
//! place where fatal errors are rendered. Suite saving and run-log recording
//! happen here, after execution, never inside the harness.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

use clap::Parser;

use crate::case::Test;
use crate::cli::args::{Command, GauntletArgs};
use crate::compare::CheckerRoutine;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::errors::GauntletError;
use crate::harness::Harness;
use crate::history::RunLog;
use crate::selector::Selector;
use crate::suite::{SaveOutcome, SuiteStore};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = GauntletArgs::parse();

    match execute(args) {
        Ok(failed) => process::exit(if failed > 0 { 1 } else { 0 }),
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(2);
        }
    }
}

fn execute(args: GauntletArgs) -> Result<usize, GauntletError> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    let selector = Selector::new(&config);
    let suites = SuiteStore::new(&config);

    let tests = resolve(&args.command, &config, &selector, &suites)?;
    let prior = RunLog::load_or_empty(&config.last_run_file)?;

    let mut harness =
        Harness::new(Box::new(CheckerRoutine::new(&config, args.diff_mode))).with_prior(prior);
    if !args.pause_on.is_empty() {
        harness = harness.with_pause(args.pause_on.clone(), Box::new(pause_for_operator));
    }

    let report = harness.run(&tests);
    output::display_report(&report);

    // Recording and saving are deliberate post-run steps; failures here
    // degrade to a warning because the displayed results are still valid.
    if let Err(e) = RunLog::record(&config.last_run_file, report.entries()) {
        eprintln!("{:?}", miette::Report::new(e));
    }
    if let Some(name) = &args.save_as {
        save_suite(&suites, name, &tests, args.overwrite);
    }

    Ok(report.failed.len())
}

/// Resolves one selection directive into the concrete test sequence.
fn resolve(
    command: &Command,
    config: &Config,
    selector: &Selector,
    suites: &SuiteStore,
) -> Result<Vec<Test>, GauntletError> {
    match command {
        Command::All => {
            println!("Running all tests in {}:\n", config.test_root.display());
            Ok(selector.all())
        }
        Command::Glob { folder } => {
            println!("Running tests in {folder} and subfolders:\n");
            let folder = folder.trim().trim_end_matches('/');
            selector.glob(&format!("{}/**/*{}", folder, config.source_extension))
        }
        Command::Files { pattern } => {
            println!("Running any test that matches {pattern}:\n");
            selector.glob(pattern.trim())
        }
        Command::Phase { spec, check } => {
            match check {
                Some(check) => println!("Running phase {spec} check {check}:\n"),
                None => println!("Running phase {spec}:\n"),
            }
            selector.phase_check(spec, check.as_deref().unwrap_or("*"))
        }
        Command::Check { spec } => {
            println!("Running check {spec}:\n");
            selector.phase_check("*", spec)
        }
        Command::Suite { name } => {
            let suite = suites.load(name.trim())?;
            println!("Running {} ({}):\n", suite.name, suite.filename.display());
            selector.suite(&suite)
        }
        Command::Failed => {
            println!("Running tests that failed last time:\n");
            selector.failed_from_log(&config.last_run_file)
        }
        Command::Failing { file } => {
            println!("Running all tests currently failing:\n");
            let path = file.clone().unwrap_or_else(|| config.failing_file.clone());
            let suite = suites.load_from_file(&path)?;
            selector.suite(&suite)
        }
        Command::Pipe => {
            println!("Running tests from pipe:\n");
            selector.from_reader(io::stdin().lock())
        }
    }
}

/// Production pause wiring: block on a line from the operator.
fn pause_for_operator() {
    println!("Paused. Press Enter to continue.");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

fn save_suite(suites: &SuiteStore, name: &str, tests: &[Test], overwrite: bool) {
    match suites.save(name, tests, overwrite) {
        Ok(SaveOutcome::Saved(path)) => {
            println!("\nSaved these tests as {} ({}).", name, path.display());
        }
        Ok(SaveOutcome::AlreadyExists(_)) => {
            println!("\nSuite {name} already exists. Use --save {name} -o to overwrite.");
        }
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
        }
    }
}
