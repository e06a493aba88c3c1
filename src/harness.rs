//! Test execution and outcome bookkeeping.
//!
//! The harness walks a resolved test sequence strictly in order, asks the
//! injected comparison routine to judge each test, and files the outcome
//! into the run report. Against an injected prior run log it derives the
//! regression and fix sets. It never persists anything; recording the
//! report is the caller's explicit step.

use std::collections::BTreeSet;

use crate::case::{Outcome, Test};
use crate::compare::CompareRoutine;
use crate::history::RunLog;

/// Injected confirmation capability for the pause checkpoint. Production
/// wiring blocks on operator input; tests substitute a recorder.
pub type ConfirmFn = Box<dyn FnMut()>;

struct PausePolicy {
    on: Vec<Outcome>,
    confirm: ConfirmFn,
}

/// The complete classified output of one harness invocation.
#[derive(Debug, Default)]
pub struct RunReport {
    entries: Vec<(Test, Outcome)>,
    pub passed: Vec<Test>,
    pub failed: Vec<Test>,
    pub skipped: Vec<Test>,
    pub warned: Vec<Test>,
    /// Tests that passed last run but failed or warned this run. Sorted by
    /// path for reproducible output.
    pub regressions: BTreeSet<Test>,
    /// Tests that failed or warned last run but passed this run. Sorted.
    pub fixes: BTreeSet<Test>,
    /// Diagnostic detail per non-passing test, in execution order.
    pub details: Vec<(Test, Outcome, String)>,
}

impl RunReport {
    /// Headline count for the summary: passed + failed + skipped. Warned
    /// tests are reported on their own count line, not in this total.
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len() + self.skipped.len()
    }

    /// (test, outcome) pairs in execution order, as fed to the run log.
    pub fn entries(&self) -> impl Iterator<Item = (&Test, Outcome)> {
        self.entries.iter().map(|(t, o)| (t, *o))
    }

    fn file(&mut self, test: Test, outcome: Outcome, detail: Option<String>, prior: &RunLog) {
        match outcome {
            Outcome::Passed => self.passed.push(test.clone()),
            Outcome::Failed => self.failed.push(test.clone()),
            Outcome::Skipped => self.skipped.push(test.clone()),
            Outcome::Warned => self.warned.push(test.clone()),
        }
        if let Some(detail) = detail {
            self.details.push((test.clone(), outcome, detail));
        }

        // A test never seen before contributes to neither set.
        match (outcome, prior.previous_outcome(&test)) {
            (Outcome::Failed | Outcome::Warned, Some(Outcome::Passed)) => {
                self.regressions.insert(test.clone());
            }
            (Outcome::Passed, Some(Outcome::Failed | Outcome::Warned)) => {
                self.fixes.insert(test.clone());
            }
            _ => {}
        }

        self.entries.push((test, outcome));
    }
}

/// Sequential executor over an injected comparison routine.
pub struct Harness {
    routine: Box<dyn CompareRoutine>,
    pause: Option<PausePolicy>,
    prior: RunLog,
}

impl Harness {
    pub fn new(routine: Box<dyn CompareRoutine>) -> Self {
        Self {
            routine,
            pause: None,
            prior: RunLog::empty(),
        }
    }

    /// Suspend after any outcome in `on`, resuming only when `confirm`
    /// returns. A checkpoint, not an error condition.
    pub fn with_pause(mut self, on: Vec<Outcome>, confirm: ConfirmFn) -> Self {
        self.pause = Some(PausePolicy { on, confirm });
        self
    }

    /// Prior run state used to derive regressions and fixes.
    pub fn with_prior(mut self, prior: RunLog) -> Self {
        self.prior = prior;
        self
    }

    /// Runs every test in sequence order, one at a time. Each test yields
    /// exactly one outcome; routine failures are already folded into the
    /// comparison it returns, so the loop itself cannot abort mid-run.
    pub fn run(&mut self, tests: &[Test]) -> RunReport {
        let mut report = RunReport::default();
        for test in tests {
            let comparison = self.routine.compare(test);
            report.file(
                test.clone(),
                comparison.outcome,
                comparison.detail,
                &self.prior,
            );

            if let Some(pause) = &mut self.pause {
                if pause.on.contains(&comparison.outcome) {
                    (pause.confirm)();
                }
            }
        }
        report
    }
}
