//! Package reference and resolution errors

use super::TytheError;

/// Creates an invalid package reference error
pub fn invalid_reference(input: impl Into<String>, reason: impl Into<String>) -> TytheError {
    TytheError::InvalidReference {
        input: input.into(),
        reason: reason.into(),
    }
}

/// Creates a resolution failed error
pub fn failed(reference: impl Into<String>, reason: impl Into<String>) -> TytheError {
    TytheError::ResolutionFailed {
        reference: reference.into(),
        reason: reason.into(),
    }
}
