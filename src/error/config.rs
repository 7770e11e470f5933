//! Donation configuration errors

use super::TytheError;

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> TytheError {
    TytheError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> TytheError {
    TytheError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(path: impl Into<String>, message: impl Into<String>) -> TytheError {
    TytheError::ConfigInvalid {
        path: path.into(),
        message: message.into(),
    }
}
