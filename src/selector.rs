//! Selection resolution.
//!
//! A [`Selector`] translates one selection directive (all tests, a glob, a
//! phase/check pair, a piped list, the previously-failed set) into a concrete
//! ordered `Vec<Test>` without executing anything.
//!
//! The interesting decision lives in [`plan_phase_check`]: native glob
//! character ranges can only enumerate single digits, so a range like `5-9`
//! becomes the glob class `[5-9]`, while a range containing any multi-digit
//! bound (`5-20`) cannot be expressed as a glob and is expanded into a regex
//! alternation instead. Which path is taken is a pure function of the
//! numeric token widths.

use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::case::Test;
use crate::config::Config;
use crate::errors::{GauntletError, SelectionOrigin};
use crate::suite::Suite;

/// Token shape for one phase/check spec: `<#>`, `<from>-<to>`, or `*`.
static VALID_SPEC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(-\d+)?$|^\*$").unwrap());

/// Detects ranges a single-character glob class cannot represent.
static MULTI_DIGIT_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{2,}-\d+|\d+-\d{2,})").unwrap());

/// Extracts failed-test lines from the run log.
static FAILED_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^f (.*)$").unwrap());

/// How a phase/check pair will be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseCheckPlan {
    Glob(String),
    Regex(String),
}

/// Resolves selection directives against one configured test repository.
pub struct Selector<'a> {
    config: &'a Config,
}

impl<'a> Selector<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Every test under the test root, sorted by path. Never fails; an empty
    /// or missing root yields an empty set.
    pub fn all(&self) -> Vec<Test> {
        let mut tests: Vec<Test> = WalkDir::new(&self.config.test_root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let relative = e.path().strip_prefix(&self.config.test_root).ok()?;
                let path = relative.to_string_lossy().replace('\\', "/");
                path.ends_with(&self.config.source_extension)
                    .then(|| Test::new(path))
            })
            .collect();
        tests.sort();
        tests
    }

    /// Tests whose path matches a filesystem-style glob. Supports `**`
    /// recursive segments, `*`/`?` within a segment, and `[a-b]` classes.
    pub fn glob(&self, pattern: &str) -> Result<Vec<Test>, GauntletError> {
        let regex = glob_to_regex(pattern)?;
        let origin = SelectionOrigin::Glob {
            pattern: pattern.to_string(),
        };
        self.matching(&regex, origin)
    }

    /// Tests whose path matches a compiled regex. Used directly by embedders
    /// and as the fallback for multi-digit phase/check ranges.
    pub fn regex(
        &self,
        pattern: &Regex,
        origin: SelectionOrigin,
    ) -> Result<Vec<Test>, GauntletError> {
        self.matching(pattern, origin)
    }

    /// Combined phase/check selection with the glob/regex fallback rule.
    pub fn phase_check(&self, phase: &str, check: &str) -> Result<Vec<Test>, GauntletError> {
        let phase = phase.trim();
        let check = check.trim();
        let origin = SelectionOrigin::PhaseCheck {
            phase: phase.to_string(),
            check: check.to_string(),
        };

        match plan_phase_check(phase, check, &self.config.source_extension)? {
            Some(PhaseCheckPlan::Glob(glob)) => {
                let regex = glob_to_regex(&glob)?;
                self.matching(&regex, origin)
            }
            Some(PhaseCheckPlan::Regex(pattern)) => {
                let regex = Regex::new(&pattern).map_err(|e| GauntletError::BadPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                self.regex(&regex, origin)
            }
            // Reversed range: well-formed but selects nothing.
            None => Err(GauntletError::empty_set(origin)),
        }
    }

    /// The stored sequence of an already-loaded suite, in stored order.
    pub fn suite(&self, suite: &Suite) -> Result<Vec<Test>, GauntletError> {
        if suite.tests.is_empty() {
            return Err(GauntletError::empty_set(SelectionOrigin::Suite {
                name: suite.name.clone(),
            }));
        }
        Ok(suite.tests.clone())
    }

    /// One test per line from a stream, blank lines dropped, order kept.
    pub fn from_reader(&self, reader: impl BufRead) -> Result<Vec<Test>, GauntletError> {
        let mut tests = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| GauntletError::PipeRead {
                reason: e.to_string(),
            })?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                tests.push(Test::new(trimmed));
            }
        }
        if tests.is_empty() {
            return Err(GauntletError::empty_set(SelectionOrigin::Other {
                directive: "pipe".to_string(),
            }));
        }
        Ok(tests)
    }

    /// Every test recorded as failed in the given run log, in file order.
    pub fn failed_from_log(&self, path: &std::path::Path) -> Result<Vec<Test>, GauntletError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GauntletError::HistoryIo {
                path: path.display().to_string(),
                source: e,
            })?;
        let tests: Vec<Test> = FAILED_LINE
            .captures_iter(&content)
            .map(|c| c[1].trim().to_string())
            .filter(|p| !p.is_empty())
            .map(Test::new)
            .collect();
        if tests.is_empty() {
            return Err(GauntletError::empty_set(SelectionOrigin::Other {
                directive: "failed".to_string(),
            }));
        }
        Ok(tests)
    }

    fn matching(&self, regex: &Regex, origin: SelectionOrigin) -> Result<Vec<Test>, GauntletError> {
        let tests: Vec<Test> = self
            .all()
            .into_iter()
            .filter(|t| regex.is_match(t.path()))
            .collect();
        if tests.is_empty() {
            return Err(GauntletError::empty_set(origin));
        }
        Ok(tests)
    }
}

// ============================================================================
// PHASE/CHECK PATTERN CONSTRUCTION
// ============================================================================

/// Validates both specs and decides the resolution path. Returns `None` for a
/// well-formed but reversed range, which can never select anything.
pub fn plan_phase_check(
    phase: &str,
    check: &str,
    extension: &str,
) -> Result<Option<PhaseCheckPlan>, GauntletError> {
    for spec in [phase, check] {
        if !VALID_SPEC.is_match(spec) {
            return Err(GauntletError::InvalidSpec {
                given: spec.to_string(),
            });
        }
        if let Some((lo, hi)) = range_bounds(spec) {
            if lo > hi {
                return Ok(None);
            }
        }
    }

    let plan = if spans_multiple_digits(phase) || spans_multiple_digits(check) {
        PhaseCheckPlan::Regex(build_regex(phase, check, extension))
    } else {
        PhaseCheckPlan::Glob(build_glob(phase, check, extension))
    };
    Ok(Some(plan))
}

/// True when `spec` is a range with a bound a glob class cannot express.
pub fn spans_multiple_digits(spec: &str) -> bool {
    MULTI_DIGIT_RANGE.is_match(spec)
}

/// Glob form of a phase/check pair; only valid when both specs are `*`,
/// single numbers, or single-digit ranges.
pub fn build_glob(phase: &str, check: &str, extension: &str) -> String {
    format!(
        "phase{}/check{}/**/*{}",
        glob_token(phase),
        glob_token(check),
        extension
    )
}

/// Regex form of a phase/check pair, with numeric ranges expanded to an
/// alternation so multi-digit bounds match correctly.
pub fn build_regex(phase: &str, check: &str, extension: &str) -> String {
    format!(
        "^phase(?:{})/check(?:{})/.*{}$",
        regex_token(phase),
        regex_token(check),
        regex::escape(extension)
    )
}

fn range_bounds(spec: &str) -> Option<(u64, u64)> {
    let (lo, hi) = spec.split_once('-')?;
    Some((lo.parse().ok()?, hi.parse().ok()?))
}

fn glob_token(spec: &str) -> String {
    match spec.split_once('-') {
        Some((lo, hi)) => format!("[{lo}-{hi}]"),
        None => spec.to_string(),
    }
}

fn regex_token(spec: &str) -> String {
    if spec == "*" {
        return r"\d+".to_string();
    }
    match range_bounds(spec) {
        Some((lo, hi)) => (lo..=hi)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("|"),
        None => spec.to_string(),
    }
}

// ============================================================================
// GLOB COMPILATION
// ============================================================================

/// Compiles a slash-separated glob into an anchored regex. `**` spans path
/// segments; `*` and `?` stay within one.
pub fn glob_to_regex(pattern: &str) -> Result<Regex, GauntletError> {
    let bad = |reason: &str| GauntletError::BadPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let mut regex = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        chars.next();
                        // `**/` matches zero or more whole segments.
                        regex.push_str("(?:[^/]*/)*");
                    } else {
                        regex.push_str(".*");
                    }
                } else {
                    regex.push_str("[^/]*");
                }
            }
            '?' => regex.push_str("[^/]"),
            '[' => {
                regex.push('[');
                if chars.peek() == Some(&'!') {
                    chars.next();
                    regex.push('^');
                }
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ']' {
                        closed = true;
                        break;
                    }
                    if inner == '\\' {
                        regex.push('\\');
                    }
                    regex.push(inner);
                }
                if !closed {
                    return Err(bad("unterminated character class"));
                }
                regex.push(']');
            }
            c if r"\.+()|^${}".contains(c) => {
                regex.push('\\');
                regex.push(c);
            }
            c => regex.push(c),
        }
    }
    regex.push('$');

    Regex::new(&regex).map_err(|e| bad(&e.to_string()))
}
