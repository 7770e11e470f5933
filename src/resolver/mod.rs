//! Package resolution
//!
//! Maps a [`PackageReference`] to a directory on disk that can be inspected:
//! - Local references resolve to themselves after a sanity check
//! - Remote references are fetched through the [`PackageCache`]
//!
//! Resolution never returns a partially fetched directory: the cache only
//! exposes entries whose fetch completed.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::cache::PackageCache;
use crate::error::{Result, TytheError, resolution};
use crate::source::{GitSource, PackageReference};

/// A package materialized on the local filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPackage {
    /// Canonical identity of the reference (canonical path or repository identity)
    pub identity: String,
    /// Directory containing the package
    pub directory: PathBuf,
    /// Reference this package was resolved from
    pub reference: PackageReference,
    /// Commit checked out, for remote packages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Resolves package references, fetching remote ones into a cache directory
#[derive(Debug)]
pub struct PackageResolver {
    cache: PackageCache,
}

impl PackageResolver {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache: PackageCache::new(cache_dir),
        }
    }

    /// Resolve a reference to a package directory
    pub fn resolve(&self, reference: &PackageReference) -> Result<ResolvedPackage> {
        match reference {
            PackageReference::Local { path } => resolve_local(reference, path),
            PackageReference::Remote(git) => self.resolve_remote(reference, git),
        }
    }

    fn resolve_remote(
        &self,
        reference: &PackageReference,
        git: &GitSource,
    ) -> Result<ResolvedPackage> {
        let checkout = self
            .cache
            .fetch(&git.url, git.git_ref.as_deref())
            .map_err(|e| as_resolution_error(reference, e))?;

        let directory = match &git.path {
            Some(subdir) => checkout.path.join(subdir),
            None => checkout.path.clone(),
        };
        if !directory.is_dir() {
            return Err(resolution::failed(
                reference.to_string(),
                format!(
                    "'{}' not found in repository at {}",
                    git.path.as_deref().unwrap_or("."),
                    &checkout.sha
                ),
            ));
        }

        debug!(identity = %git.canonical(), dir = %directory.display(), "resolved remote package");
        Ok(ResolvedPackage {
            identity: git.canonical(),
            directory,
            reference: reference.clone(),
            sha: Some(checkout.sha),
        })
    }
}

fn resolve_local(reference: &PackageReference, path: &Path) -> Result<ResolvedPackage> {
    let directory = dunce::canonicalize(path).map_err(|e| {
        resolution::failed(reference.to_string(), format!("cannot access directory: {e}"))
    })?;
    if !directory.is_dir() {
        return Err(resolution::failed(
            reference.to_string(),
            "not a directory",
        ));
    }
    Ok(ResolvedPackage {
        identity: directory.display().to_string(),
        directory,
        reference: reference.clone(),
        sha: None,
    })
}

/// Git and cache errors keep their own variants; they already say what
/// failed. Anything else is wrapped with the reference it happened for.
fn as_resolution_error(reference: &PackageReference, err: TytheError) -> TytheError {
    match err {
        TytheError::GitCloneFailed { .. }
        | TytheError::GitRefResolveFailed { .. }
        | TytheError::GitCheckoutFailed { .. }
        | TytheError::CacheEntryIncomplete { .. }
        | TytheError::CacheOperationFailed { .. } => err,
        other => resolution::failed(reference.to_string(), other.to_string()),
    }
}
