//! Distribution calculation errors

use super::TytheError;

/// Creates an invalid amount error
pub fn invalid_amount(amount: f64) -> TytheError {
    TytheError::InvalidAmount {
        amount: amount.to_string(),
    }
}

/// Creates an invalid weight error
pub fn invalid_weight(identity: impl Into<String>, weight: f64) -> TytheError {
    TytheError::InvalidWeight {
        identity: identity.into(),
        weight: weight.to_string(),
    }
}
