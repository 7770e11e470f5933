//! Dependency manifest errors

use super::TytheError;

/// Creates a manifest read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> TytheError {
    TytheError::ManifestReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a manifest parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> TytheError {
    TytheError::ManifestParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
