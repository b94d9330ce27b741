//! Command grammar errors

use super::PxDiagError;

/// Creates an invalid grammar error
pub fn invalid(message: impl Into<String>) -> PxDiagError {
    PxDiagError::GrammarInvalid {
        message: message.into(),
    }
}
