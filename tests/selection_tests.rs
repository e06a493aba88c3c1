//! Selection resolution tests: discovery order, glob and phase/check
//! resolution, the glob-vs-regex width rule, and empty-set reporting.

mod common;

use std::io::Cursor;

use gauntlet::case::Test;
use gauntlet::errors::{GauntletError, SelectionOrigin};
use gauntlet::selector::{plan_phase_check, PhaseCheckPlan, Selector};
use gauntlet::suite::Suite;

use common::{config_in, phase_repo};

#[test]
fn all_returns_every_source_file_sorted() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let tests = Selector::new(&config).all();

    let paths: Vec<&str> = tests.iter().map(Test::path).collect();
    assert_eq!(
        paths,
        vec![
            "misc/h.src",
            "phase1/check1/a.src",
            "phase1/check2/b.src",
            "phase10/check1/e.src",
            "phase20/check3/f.src",
            "phase21/check1/g.src",
            "phase5/check1/c.src",
            "phase9/check2/d.src",
        ]
    );
}

#[test]
fn all_on_missing_root_is_empty_not_an_error() {
    let repo = tempfile::TempDir::new().unwrap();
    let config = config_in(repo.path());
    assert!(Selector::new(&config).all().is_empty());
}

#[test]
fn folder_glob_does_not_leak_into_sibling_folders() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let tests = Selector::new(&config).glob("phase1/**/*.src").unwrap();

    let paths: Vec<&str> = tests.iter().map(Test::path).collect();
    assert_eq!(paths, vec!["phase1/check1/a.src", "phase1/check2/b.src"]);
}

#[test]
fn multi_digit_phase_range_matches_numerically() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let tests = Selector::new(&config).phase_check("5-20", "*").unwrap();

    let paths: Vec<&str> = tests.iter().map(Test::path).collect();
    assert_eq!(
        paths,
        vec![
            "phase10/check1/e.src",
            "phase20/check3/f.src",
            "phase5/check1/c.src",
            "phase9/check2/d.src",
        ]
    );
}

#[test]
fn single_digit_range_narrows_by_check() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let tests = Selector::new(&config).phase_check("5-9", "2").unwrap();

    let paths: Vec<&str> = tests.iter().map(Test::path).collect();
    assert_eq!(paths, vec!["phase9/check2/d.src"]);
}

#[test]
fn wildcard_pair_selects_all_phase_tests_but_not_strays() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let tests = Selector::new(&config).phase_check("*", "*").unwrap();

    assert_eq!(tests.len(), 7);
    assert!(tests.iter().all(|t| t.path().starts_with("phase")));
}

#[test]
fn path_choice_is_a_pure_function_of_token_width() {
    let specs = [
        "*", "0", "5", "9", "15", "120", "5-9", "0-9", "1-100", "5-20", "12-15",
    ];
    for phase in specs {
        for check in specs {
            let plan = plan_phase_check(phase, check, ".src")
                .unwrap()
                .expect("no reversed ranges in this grid");
            let multi = |s: &str| {
                s.split_once('-')
                    .is_some_and(|(lo, hi)| lo.len() > 1 || hi.len() > 1)
            };
            let expect_regex = multi(phase) || multi(check);
            match plan {
                PhaseCheckPlan::Regex(_) => {
                    assert!(expect_regex, "phase={phase} check={check}")
                }
                PhaseCheckPlan::Glob(_) => {
                    assert!(!expect_regex, "phase={phase} check={check}")
                }
            }
        }
    }
}

#[test]
fn regex_resolution_filters_by_compiled_pattern() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let origin = SelectionOrigin::Other {
        directive: "regex".to_string(),
    };

    let pattern = regex::Regex::new(r"^phase\d+/check1/").unwrap();
    let tests = Selector::new(&config)
        .regex(&pattern, origin.clone())
        .unwrap();
    let paths: Vec<&str> = tests.iter().map(Test::path).collect();
    assert_eq!(
        paths,
        vec![
            "phase1/check1/a.src",
            "phase10/check1/e.src",
            "phase21/check1/g.src",
            "phase5/check1/c.src",
        ]
    );

    let unmatched = regex::Regex::new(r"^phase99/").unwrap();
    let err = Selector::new(&config)
        .regex(&unmatched, origin)
        .unwrap_err();
    assert!(err.is_empty_set());
}

#[test]
fn malformed_specs_fail_validation_and_run_nothing() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let selector = Selector::new(&config);

    for bad in ["x", "1-", "-2", "1-2-3", "1.5", "5-9a"] {
        let err = selector.phase_check(bad, "*").unwrap_err();
        assert!(
            matches!(err, GauntletError::InvalidSpec { .. }),
            "spec {bad:?} should be rejected, got {err:?}"
        );
        assert_eq!(
            err.to_string(),
            "Phase/check must be `<#>` or `<from>-<to>`."
        );
    }
}

#[test]
fn leading_and_trailing_spec_whitespace_is_trimmed() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let tests = Selector::new(&config).phase_check(" 5-9 ", " 2 ").unwrap();
    assert_eq!(tests.len(), 1);
}

#[test]
fn empty_glob_result_reports_glob_origin_with_files_hint() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let err = Selector::new(&config).glob("phase99/**/*.src").unwrap_err();

    assert!(err.is_empty_set());
    let GauntletError::EmptyTestSet { origin, hint, .. } = &err else {
        panic!("expected empty set, got {err:?}");
    };
    assert!(matches!(origin, SelectionOrigin::Glob { .. }));
    assert!(hint.as_deref().unwrap().contains("gauntlet files"));
    assert!(err.to_string().contains("phase99/**/*.src"));
}

#[test]
fn empty_suite_reports_suite_origin_with_a_different_message() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let suite = Suite {
        name: "nightly".to_string(),
        filename: repo.path().join("suites/nightly.txt"),
        tests: vec![],
    };
    let err = Selector::new(&config).suite(&suite).unwrap_err();

    assert!(err.is_empty_set());
    assert_eq!(err.to_string(), "Suite `nightly` selected no tests.");

    let glob_err = Selector::new(&config).glob("phase99/*.src").unwrap_err();
    assert_ne!(err.to_string(), glob_err.to_string());
}

#[test]
fn reversed_range_is_empty_not_invalid() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let err = Selector::new(&config).phase_check("9-5", "*").unwrap_err();
    assert!(err.is_empty_set());
}

#[test]
fn pipe_preserves_order_and_drops_blank_lines() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let input = "  phase9/check2/d.src  \n\nphase1/check1/a.src\n   \n";
    let tests = Selector::new(&config)
        .from_reader(Cursor::new(input))
        .unwrap();

    let paths: Vec<&str> = tests.iter().map(Test::path).collect();
    assert_eq!(paths, vec!["phase9/check2/d.src", "phase1/check1/a.src"]);
}

#[test]
fn empty_pipe_is_an_empty_test_set() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let err = Selector::new(&config)
        .from_reader(Cursor::new("\n  \n"))
        .unwrap_err();
    assert!(err.is_empty_set());
}

#[test]
fn failed_log_replay_keeps_file_order() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    std::fs::create_dir_all(config.last_run_file.parent().unwrap()).unwrap();
    std::fs::write(
        &config.last_run_file,
        "f phase9/check2/d.src\np phase1/check1/a.src\nf misc/h.src\n",
    )
    .unwrap();

    let tests = Selector::new(&config)
        .failed_from_log(&config.last_run_file)
        .unwrap();
    let paths: Vec<&str> = tests.iter().map(Test::path).collect();
    assert_eq!(paths, vec!["phase9/check2/d.src", "misc/h.src"]);
}

#[test]
fn failed_log_with_no_failures_is_an_empty_test_set() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    std::fs::create_dir_all(config.last_run_file.parent().unwrap()).unwrap();
    std::fs::write(&config.last_run_file, "p phase1/check1/a.src\n").unwrap();

    let err = Selector::new(&config)
        .failed_from_log(&config.last_run_file)
        .unwrap_err();
    assert!(err.is_empty_set());
}

#[test]
fn missing_failed_log_is_an_io_error_not_empty() {
    let repo = phase_repo();
    let config = config_in(repo.path());
    let err = Selector::new(&config)
        .failed_from_log(&config.last_run_file)
        .unwrap_err();
    assert!(matches!(err, GauntletError::HistoryIo { .. }));
}
