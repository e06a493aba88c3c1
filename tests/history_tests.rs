//! Run-log persistence tests: marker format, whole-file replacement, and
//! the interplay with failed-test replay.

mod common;

use std::fs;

use gauntlet::case::{Outcome, Test};
use gauntlet::compare::{CompareRoutine, Comparison};
use gauntlet::harness::Harness;
use gauntlet::history::RunLog;
use gauntlet::selector::Selector;

use common::{config_in, phase_repo};

struct AlwaysFail;

impl CompareRoutine for AlwaysFail {
    fn compare(&mut self, _test: &Test) -> Comparison {
        Comparison::of(Outcome::Failed, "nope")
    }
}

#[test]
fn record_writes_one_marker_line_per_test() {
    let repo = tempfile::TempDir::new().unwrap();
    let config = config_in(repo.path());

    let entries = [
        (Test::new("a.src"), Outcome::Passed),
        (Test::new("b.src"), Outcome::Failed),
        (Test::new("c.src"), Outcome::Skipped),
        (Test::new("d.src"), Outcome::Warned),
    ];
    RunLog::record(&config.last_run_file, entries.iter().map(|(t, o)| (t, *o))).unwrap();

    let content = fs::read_to_string(&config.last_run_file).unwrap();
    assert_eq!(content, "p a.src\nf b.src\ns c.src\nw d.src\n");
}

#[test]
fn record_replaces_previous_contents_entirely() {
    let repo = tempfile::TempDir::new().unwrap();
    let config = config_in(repo.path());

    let first = [(Test::new("old.src"), Outcome::Failed)];
    RunLog::record(&config.last_run_file, first.iter().map(|(t, o)| (t, *o))).unwrap();

    let second = [(Test::new("new.src"), Outcome::Passed)];
    RunLog::record(&config.last_run_file, second.iter().map(|(t, o)| (t, *o))).unwrap();

    let log = RunLog::load_or_empty(&config.last_run_file).unwrap();
    assert_eq!(log.previous_outcome(&Test::new("old.src")), None);
    assert_eq!(
        log.previous_outcome(&Test::new("new.src")),
        Some(Outcome::Passed)
    );
    assert_eq!(log.len(), 1);
}

#[test]
fn missing_log_loads_as_empty() {
    let repo = tempfile::TempDir::new().unwrap();
    let config = config_in(repo.path());
    let log = RunLog::load_or_empty(&config.last_run_file).unwrap();
    assert!(log.is_empty());
}

#[test]
fn recorded_run_round_trips_through_load() {
    let repo = tempfile::TempDir::new().unwrap();
    let config = config_in(repo.path());

    let tests = vec![Test::new("a.src"), Test::new("b.src")];
    let report = Harness::new(Box::new(AlwaysFail)).run(&tests);
    RunLog::record(&config.last_run_file, report.entries()).unwrap();

    let log = RunLog::load_or_empty(&config.last_run_file).unwrap();
    for test in &tests {
        assert_eq!(log.previous_outcome(test), Some(Outcome::Failed));
    }
}

#[test]
fn failed_replay_runs_exactly_the_recorded_failures() {
    let repo = phase_repo();
    let config = config_in(repo.path());

    let entries = [
        (Test::new("phase1/check1/a.src"), Outcome::Failed),
        (Test::new("phase1/check2/b.src"), Outcome::Passed),
        (Test::new("phase5/check1/c.src"), Outcome::Failed),
    ];
    RunLog::record(&config.last_run_file, entries.iter().map(|(t, o)| (t, *o))).unwrap();

    let replay = Selector::new(&config)
        .failed_from_log(&config.last_run_file)
        .unwrap();
    assert_eq!(
        replay,
        vec![
            Test::new("phase1/check1/a.src"),
            Test::new("phase5/check1/c.src"),
        ]
    );
}
