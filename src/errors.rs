//! Gauntlet error handling.
//!
//! Every fatal condition in the crate resolves to one [`GauntletError`]
//! variant. Resolution-time errors (bad selector specs, empty selections,
//! missing suites) propagate to the top level and are rendered once through
//! `miette`; execution-time failures inside a comparison routine are folded
//! into that test's outcome and never surface here.

use std::io;

use miette::Diagnostic;
use thiserror::Error;

/// Where an empty selection came from. The console hint differs per origin
/// so the user gets a corrective command that matches what they typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOrigin {
    Glob { pattern: String },
    Suite { name: String },
    PhaseCheck { phase: String, check: String },
    Other { directive: String },
}

impl SelectionOrigin {
    fn describe(&self) -> String {
        match self {
            SelectionOrigin::Glob { pattern } => {
                format!("No tests match `{pattern}`.")
            }
            SelectionOrigin::Suite { name } => {
                format!("Suite `{name}` selected no tests.")
            }
            SelectionOrigin::PhaseCheck { phase, check } => {
                format!("No tests found for phase `{phase}` check `{check}`.")
            }
            SelectionOrigin::Other { directive } => {
                format!("No tests selected by `{directive}`.")
            }
        }
    }

    fn hint(&self) -> Option<String> {
        match self {
            SelectionOrigin::Glob { .. } => Some(
                "To run specific tests, use: gauntlet files path/to/test*.src".to_string(),
            ),
            SelectionOrigin::Suite { name } => Some(format!(
                "To see its contents, open the suite file for `{name}` in the suite directory."
            )),
            _ => None,
        }
    }
}

/// Unified error type for all harness failure modes.
#[derive(Debug, Error, Diagnostic)]
pub enum GauntletError {
    /// Malformed phase/check selector. The message is the grammar itself;
    /// the offending token rides along in the help text.
    #[error("Phase/check must be `<#>` or `<from>-<to>`.")]
    #[diagnostic(code(gauntlet::selector::spec), help("got `{given}`"))]
    InvalidSpec { given: String },

    /// A glob or regex pattern that cannot be compiled.
    #[error("Cannot compile pattern `{pattern}`: {reason}")]
    #[diagnostic(code(gauntlet::selector::pattern))]
    BadPattern { pattern: String, reason: String },

    /// A resolution step produced zero tests. Likely user input, not a bug,
    /// so the rendering carries a corrective hint where one exists.
    #[error("{description}")]
    #[diagnostic(code(gauntlet::selector::empty))]
    EmptyTestSet {
        description: String,
        origin: SelectionOrigin,
        #[help]
        hint: Option<String>,
    },

    /// A named suite has no backing file or the file is unreadable.
    #[error("Cannot load suite from `{filename}`.")]
    #[diagnostic(
        code(gauntlet::suite::load),
        help("To see what suites are available, list the suite directory.")
    )]
    SuiteLoad {
        filename: String,
        #[source]
        source: Option<io::Error>,
    },

    /// I/O failure while persisting a suite. Callers catch this at the save
    /// site and degrade to a warning; the run's results are still valid.
    #[error("Cannot save suite to `{filename}`.")]
    #[diagnostic(
        code(gauntlet::suite::save),
        help("Please try again or check the permissions.")
    )]
    SuiteSave {
        filename: String,
        #[source]
        source: io::Error,
    },

    /// I/O failure reading or replacing the last-run log.
    #[error("Cannot access run log `{path}`.")]
    #[diagnostic(code(gauntlet::history::io))]
    HistoryIo {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Config file present but unreadable or not valid YAML.
    #[error("Cannot load config from `{path}`: {reason}")]
    #[diagnostic(code(gauntlet::config::load))]
    ConfigLoad { path: String, reason: String },

    /// I/O failure while reading a piped test list.
    #[error("Cannot read test list from stream: {reason}")]
    #[diagnostic(code(gauntlet::selector::pipe))]
    PipeRead { reason: String },
}

impl GauntletError {
    /// Builds the empty-selection error for a given directive origin.
    pub fn empty_set(origin: SelectionOrigin) -> Self {
        GauntletError::EmptyTestSet {
            description: origin.describe(),
            hint: origin.hint(),
            origin,
        }
    }

    /// True for the empty-selection case, which front ends present
    /// differently from malformed input.
    pub fn is_empty_set(&self) -> bool {
        matches!(self, GauntletError::EmptyTestSet { .. })
    }
}
