//! Command resolution and dispatch errors

use super::PxDiagError;

/// Creates an unknown command error
pub fn unknown(input: impl Into<String>) -> PxDiagError {
    PxDiagError::UnknownCommand {
        input: input.into(),
    }
}

/// Creates an ambiguous command error
pub fn ambiguous(token: impl Into<String>, candidates: Vec<String>) -> PxDiagError {
    PxDiagError::AmbiguousCommand {
        token: token.into(),
        candidates,
    }
}

/// Creates a missing argument error
pub fn missing_argument(
    command: impl Into<String>,
    expected: impl Into<String>,
    got: usize,
) -> PxDiagError {
    PxDiagError::MissingArgument {
        command: command.into(),
        expected: expected.into(),
        got,
    }
}

/// Creates a no data error, optionally naming the sub-key that was asked for
pub fn no_data(resource: impl Into<String>, key: Option<&str>) -> PxDiagError {
    PxDiagError::NoData {
        resource: resource.into(),
        key: key.map(str::to_string),
    }
}
