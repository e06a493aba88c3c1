//! Comparison routines.
//!
//! The harness judges each test through an injected [`CompareRoutine`]
//! capability: given a test, produce an outcome kind plus optional
//! diagnostic detail. Ordinary mismatches are outcomes, never errors;
//! environment-level failures (a checker that cannot be spawned, unreadable
//! files) are folded into a failed outcome so one broken test cannot abort
//! the run.
//!
//! The shipped routine runs an optional configured checker command on the
//! test source, captures stdout, and diffs it against the sibling
//! `.expected` file. Without a checker it diffs a previously produced
//! `.out` file instead.

use std::fs;
use std::process::Command;

use difference::{Changeset, Difference};

use crate::case::{Outcome, Test};
use crate::config::Config;

/// The judgment for one test: an outcome kind plus optional detail such as a
/// rendered diff or a spawn error.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub outcome: Outcome,
    pub detail: Option<String>,
}

impl Comparison {
    pub fn passed() -> Self {
        Self {
            outcome: Outcome::Passed,
            detail: None,
        }
    }

    pub fn of(outcome: Outcome, detail: impl Into<String>) -> Self {
        Self {
            outcome,
            detail: Some(detail.into()),
        }
    }
}

/// Capability the harness calls once per test.
pub trait CompareRoutine {
    fn compare(&mut self, test: &Test) -> Comparison;
}

/// How strictly expected and actual output are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    /// Exact match passes; a match modulo per-line trailing whitespace is
    /// reported as warned.
    Text,
    /// Exact match or failure, never warned.
    Exact,
}

/// The production routine: checker command + expected-file diff.
pub struct CheckerRoutine {
    config: Config,
    mode: DiffMode,
}

impl CheckerRoutine {
    pub fn new(config: &Config, mode: DiffMode) -> Self {
        Self {
            config: config.clone(),
            mode,
        }
    }

    fn produce_output(&self, test: &Test) -> Result<String, String> {
        let source = test.source_file(&self.config);
        match &self.config.checker {
            Some(invocation) if !invocation.is_empty() => {
                let substituted: Vec<String> = invocation
                    .iter()
                    .map(|arg| arg.replace("{test}", &source.to_string_lossy()))
                    .collect();
                let output = Command::new(&substituted[0])
                    .args(&substituted[1..])
                    .output()
                    .map_err(|e| format!("cannot run checker `{}`: {e}", substituted[0]))?;
                if !output.status.success() {
                    return Err(format!(
                        "checker exited with {}: {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    ));
                }
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            _ => {
                let out_file = source.with_extension("out");
                fs::read_to_string(&out_file)
                    .map_err(|e| format!("cannot read output file `{}`: {e}", out_file.display()))
            }
        }
    }
}

impl CompareRoutine for CheckerRoutine {
    fn compare(&mut self, test: &Test) -> Comparison {
        let expected_file = test.expected_file(&self.config);
        let expected = match fs::read_to_string(&expected_file) {
            Ok(content) => content,
            Err(_) => {
                return Comparison::of(
                    Outcome::Skipped,
                    format!("no expected output at `{}`", expected_file.display()),
                );
            }
        };

        let actual = match self.produce_output(test) {
            Ok(output) => output,
            Err(detail) => return Comparison::of(Outcome::Failed, detail),
        };

        if actual == expected {
            return Comparison::passed();
        }
        if self.mode == DiffMode::Text && lenient_eq(&actual, &expected) {
            return Comparison::of(
                Outcome::Warned,
                "output matches expected after trailing-whitespace trim",
            );
        }
        Comparison::of(Outcome::Failed, render_diff(&expected, &actual))
    }
}

/// Line diff with the `-` expected / `+` actual prefixes used in reports.
pub fn render_diff(expected: &str, actual: &str) -> String {
    let changeset = Changeset::new(expected, actual, "\n");
    let mut rendered = String::new();
    for diff in &changeset.diffs {
        let (prefix, text) = match diff {
            Difference::Same(text) => (' ', text),
            Difference::Add(text) => ('+', text),
            Difference::Rem(text) => ('-', text),
        };
        for line in text.lines() {
            rendered.push(prefix);
            rendered.push_str(line);
            rendered.push('\n');
        }
    }
    rendered
}

fn lenient_eq(actual: &str, expected: &str) -> bool {
    let actual: Vec<&str> = actual.trim_end().lines().map(str::trim_end).collect();
    let expected: Vec<&str> = expected.trim_end().lines().map(str::trim_end).collect();
    actual == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_match_ignores_trailing_whitespace_only() {
        assert!(lenient_eq("a  \nb\n", "a\nb"));
        assert!(!lenient_eq("a\nb", "a\nc"));
        assert!(!lenient_eq("  a", "a"));
    }

    #[test]
    fn render_diff_prefixes_changed_lines() {
        let diff = render_diff("one\ntwo", "one\nthree");
        assert!(diff.contains(" one"));
        assert!(diff.contains("-two"));
        assert!(diff.contains("+three"));
    }
}
