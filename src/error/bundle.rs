//! Diagnostic bundle errors

use super::PxDiagError;

/// Creates a bundle unreadable error
pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> PxDiagError {
    PxDiagError::BundleUnreadable {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a partially missing warning for the given resource names
pub fn partially_missing(resources: Vec<String>) -> PxDiagError {
    PxDiagError::PartiallyMissing { resources }
}
