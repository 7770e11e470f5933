//! Error types and handling for tythe
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain, each exposing
//! small constructor functions:
//! - [`resolution`]: Package reference and resolution errors
//! - [`git`]: Git operation errors
//! - [`cache`]: Package cache errors
//! - [`manifest`]: Dependency manifest errors
//! - [`config`]: Donation configuration errors
//! - [`distribution`]: Distribution calculation errors
//! - [`payment`]: Payment errors

pub mod cache;
pub mod config;
pub mod distribution;
pub mod git;
pub mod manifest;
pub mod payment;
pub mod resolution;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for tythe operations
///
/// Every variant carries owned strings only, so errors can be cloned into
/// crawl reports and shared between threads waiting on the same fetch.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum TytheError {
    // Reference and resolution errors
    #[error("Invalid package reference: {input}: {reason}")]
    #[diagnostic(
        code(tythe::source::invalid_reference),
        help(
            "Valid formats: ./path, /abs/path, owner/repo, github.com/owner/repo, https://host/owner/repo.git#ref"
        )
    )]
    InvalidReference { input: String, reason: String },

    #[error("Failed to resolve package '{reference}': {reason}")]
    #[diagnostic(code(tythe::resolution::failed))]
    ResolutionFailed { reference: String, reason: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(tythe::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(tythe::git::clone_failed),
        help("Check that the URL is correct and you have access to the repository")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Failed to resolve git ref '{git_ref}': {reason}")]
    #[diagnostic(code(tythe::git::ref_resolve_failed))]
    GitRefResolveFailed { git_ref: String, reason: String },

    #[error("Failed to checkout commit '{sha}': {reason}")]
    #[diagnostic(code(tythe::git::checkout_failed))]
    GitCheckoutFailed { sha: String, reason: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(tythe::cache::operation_failed))]
    CacheOperationFailed { message: String },

    #[error("Incomplete cache entry: {path}")]
    #[diagnostic(
        code(tythe::cache::incomplete_entry),
        help("A previous fetch was interrupted. Run 'tythe cache clear --only {key}' and retry")
    )]
    CacheEntryIncomplete { path: String, key: String },

    // Manifest errors
    #[error("Failed to read manifest: {path}: {reason}")]
    #[diagnostic(code(tythe::manifest::read_failed))]
    ManifestReadFailed { path: String, reason: String },

    #[error("Failed to parse manifest: {path}: {reason}")]
    #[diagnostic(code(tythe::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    // Donation configuration errors
    #[error("Failed to read donation config: {path}: {reason}")]
    #[diagnostic(code(tythe::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse donation config: {path}: {reason}")]
    #[diagnostic(code(tythe::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid donation config: {path}: {message}")]
    #[diagnostic(
        code(tythe::config::invalid),
        help("A tythe.json needs a valid 'usdcAddress' (0x + 40 hex digits) or 'paypalAccount' (e-mail)")
    )]
    ConfigInvalid { path: String, message: String },

    // Distribution errors
    #[error("Cannot distribute payment: no dependencies to weigh")]
    #[diagnostic(
        code(tythe::distribution::division_undefined),
        help("The crawl found no dependencies, so there is nothing to pay")
    )]
    DivisionUndefined,

    #[error("Invalid amount: {amount}")]
    #[diagnostic(
        code(tythe::distribution::invalid_amount),
        help("Amounts must be finite and not negative")
    )]
    InvalidAmount { amount: String },

    #[error("Invalid weight {weight} for dependency '{identity}'")]
    #[diagnostic(code(tythe::distribution::invalid_weight))]
    InvalidWeight { identity: String, weight: String },

    // Payment errors
    #[error("Invalid {method} address: {address}")]
    #[diagnostic(code(tythe::payment::invalid_address))]
    InvalidAddress { method: String, address: String },

    #[error("Payment of {amount} to {address} via {method} failed: {reason}")]
    #[diagnostic(code(tythe::payment::failed))]
    PaymentFailed {
        method: String,
        address: String,
        amount: String,
        reason: String,
    },

    #[error("No payment backend configured for {method}")]
    #[diagnostic(
        code(tythe::payment::backend_missing),
        help("Set --usdc-command / TYTHE_USDC_COMMAND or --paypal-command / TYTHE_PAYPAL_COMMAND")
    )]
    PaymentBackendMissing { method: String },

    #[error("{failed} of {total} payments failed")]
    #[diagnostic(
        code(tythe::payment::incomplete),
        help("The payments listed as failed above were not made; the others were")
    )]
    PaymentsIncomplete { failed: usize, total: usize },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(tythe::cli::invalid_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    InvalidShell { shell: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(tythe::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for TytheError {
    fn from(err: std::io::Error) -> Self {
        TytheError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for TytheError {
    fn from(err: serde_yaml::Error) -> Self {
        TytheError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TytheError {
    fn from(err: serde_json::Error) -> Self {
        TytheError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TytheError {
    fn from(err: toml::de::Error) -> Self {
        TytheError::ManifestParseFailed {
            path: "unknown".to_string(),
            reason: err.message().to_string(),
        }
    }
}

impl From<git2::Error> for TytheError {
    fn from(err: git2::Error) -> Self {
        TytheError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for TytheError {
    fn from(err: inquire::InquireError) -> Self {
        TytheError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, TytheError>;
