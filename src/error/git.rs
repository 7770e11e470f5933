//! Git operation errors

use super::TytheError;

/// Creates a git clone failed error
pub fn clone_failed(url: impl Into<String>, reason: impl Into<String>) -> TytheError {
    TytheError::GitCloneFailed {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates a git ref resolve failed error
pub fn ref_resolve_failed(git_ref: impl Into<String>, reason: impl Into<String>) -> TytheError {
    TytheError::GitRefResolveFailed {
        git_ref: git_ref.into(),
        reason: reason.into(),
    }
}

/// Creates a git checkout failed error
pub fn checkout_failed(sha: impl Into<String>, reason: impl Into<String>) -> TytheError {
    TytheError::GitCheckoutFailed {
        sha: sha.into(),
        reason: reason.into(),
    }
}
