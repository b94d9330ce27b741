//! Error types and handling for pxdiag
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`bundle`]: Diagnostic bundle loading errors
//! - [`command`]: Command resolution and dispatch errors
//! - [`grammar`]: Command grammar construction errors

pub mod bundle;
pub mod command;
pub mod grammar;

pub use bundle::{partially_missing, unreadable as bundle_unreadable};
pub use command::{ambiguous, missing_argument, no_data, unknown as unknown_command};
pub use grammar::invalid as grammar_invalid;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for pxdiag operations
#[derive(Error, Diagnostic, Debug)]
pub enum PxDiagError {
    // Bundle errors
    #[error("Cannot read diagnostic bundle '{path}': {reason}")]
    #[diagnostic(
        code(pxdiag::bundle::unreadable),
        help("Pass a diag archive (.tar.gz, .tgz, .tar) or a directory it was extracted to")
    )]
    BundleUnreadable { path: String, reason: String },

    #[error("Bundle is missing {} expected resource(s): {}", .resources.len(), .resources.join(", "))]
    #[diagnostic(
        code(pxdiag::bundle::partially_missing),
        severity(Warning),
        help("Commands reading these resources will report that no data is available")
    )]
    PartiallyMissing { resources: Vec<String> },

    // Grammar errors
    #[error("Invalid command grammar: {message}")]
    #[diagnostic(code(pxdiag::grammar::invalid))]
    GrammarInvalid { message: String },

    // Command errors
    #[error("Unknown command: {input}")]
    #[diagnostic(
        code(pxdiag::command::unknown),
        help("Type 'help' to list the supported commands")
    )]
    UnknownCommand { input: String },

    #[error("Ambiguous command '{token}': could be {}", .candidates.join(", "))]
    #[diagnostic(
        code(pxdiag::command::ambiguous),
        help("Spell out the full command name")
    )]
    AmbiguousCommand {
        token: String,
        candidates: Vec<String>,
    },

    #[error("Missing required argument for '{command}': expected {expected}, got {got}")]
    #[diagnostic(
        code(pxdiag::command::missing_argument),
        help("Type 'help' to see the arguments each command takes")
    )]
    MissingArgument {
        command: String,
        expected: String,
        got: usize,
    },

    #[error("No data available for {}", describe_target(.resource, .key.as_deref()))]
    #[diagnostic(
        code(pxdiag::command::no_data),
        help("The diagnostic bundle does not contain this information")
    )]
    NoData {
        resource: String,
        key: Option<String>,
    },

    // I/O errors
    #[error("IO error: {message}")]
    #[diagnostic(code(pxdiag::io::error))]
    IoError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn describe_target(resource: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => format!("'{resource}' '{key}'"),
        None => format!("'{resource}'"),
    }
}

impl From<std::io::Error> for PxDiagError {
    fn from(err: std::io::Error) -> Self {
        PxDiagError::IoError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<rustyline::error::ReadlineError> for PxDiagError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        PxDiagError::IoError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, PxDiagError>;
