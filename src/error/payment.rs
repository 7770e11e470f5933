//! Payment errors

use super::TytheError;

/// Creates an invalid address error
pub fn invalid_address(method: impl Into<String>, address: impl Into<String>) -> TytheError {
    TytheError::InvalidAddress {
        method: method.into(),
        address: address.into(),
    }
}

/// Creates a payment failed error
pub fn failed(
    method: impl Into<String>,
    address: impl Into<String>,
    amount: f64,
    reason: impl Into<String>,
) -> TytheError {
    TytheError::PaymentFailed {
        method: method.into(),
        address: address.into(),
        amount: format!("${amount:.2}"),
        reason: reason.into(),
    }
}

/// Creates a missing payment backend error
pub fn backend_missing(method: impl Into<String>) -> TytheError {
    TytheError::PaymentBackendMissing {
        method: method.into(),
    }
}

/// Creates an error summarizing a partially failed payment run
pub fn incomplete(failed: usize, total: usize) -> TytheError {
    TytheError::PaymentsIncomplete { failed, total }
}
