//! Cache errors

use super::TytheError;

/// Creates a cache operation failed error
pub fn operation_failed(message: impl Into<String>) -> TytheError {
    TytheError::CacheOperationFailed {
        message: message.into(),
    }
}

/// Creates an incomplete cache entry error
pub fn entry_incomplete(path: impl Into<String>, key: impl Into<String>) -> TytheError {
    TytheError::CacheEntryIncomplete {
        path: path.into(),
        key: key.into(),
    }
}
