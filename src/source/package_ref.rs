//! Package reference handling
//!
//! This module provides the `PackageReference` enum for local and git-based packages.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, resolution};

use super::git_source::GitSource;

/// A package locator: either a directory on disk or a remote git repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PackageReference {
    /// Local directory
    Local {
        /// Path to the package directory (relative or absolute)
        path: PathBuf,
    },
    /// Git repository
    Remote(GitSource),
}

impl PackageReference {
    /// Create a local reference
    pub fn local(path: impl Into<PathBuf>) -> Self {
        PackageReference::Local { path: path.into() }
    }

    /// Parse a package reference from a string
    ///
    /// Supported formats:
    /// - `./path`, `../path`, `.`, `..`, `/absolute/path` - Local directory
    /// - `file:///absolute/path` - Local directory with file:// protocol
    /// - `file:///absolute/path#ref` - Local git repository at a ref
    /// - `github:user/repo`, `user/repo` - GitHub repository
    /// - `github.com/user/repo` - Host-qualified module path
    /// - `https://host/user/repo.git`, `git@host:user/repo.git` - Git URL
    /// - Any remote form with `#ref` for a branch, tag or commit
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(resolution::invalid_reference(input, "empty reference"));
        }

        if let Some(after_protocol) = input.strip_prefix("file://") {
            // A ref implies a checkout, so that is a git source
            if after_protocol.contains('#') {
                return Ok(PackageReference::Remote(GitSource::parse(input)?));
            }
            return Ok(PackageReference::local(after_protocol));
        }

        let is_local_path = input.starts_with("./")
            || input.starts_with("../")
            || input == "."
            || input == ".."
            || (input.starts_with('.') && !input.contains("://"))
            || Path::new(input).is_absolute()
            || input.starts_with('/')
            || (Path::new(input).is_dir() && !input.contains(':'));

        if is_local_path {
            return Ok(PackageReference::local(input));
        }

        Ok(PackageReference::Remote(GitSource::parse(input)?))
    }

    /// Canonical string form, used for equality of references written differently
    ///
    /// Local paths are canonicalized when they exist; remote sources use
    /// [`GitSource::canonical`].
    pub fn canonical(&self) -> String {
        match self {
            PackageReference::Local { path } => dunce::canonicalize(path)
                .unwrap_or_else(|_| path.clone())
                .display()
                .to_string(),
            PackageReference::Remote(git) => git.canonical(),
        }
    }

    /// Check if this is a local directory reference
    pub fn is_local(&self) -> bool {
        matches!(self, PackageReference::Local { .. })
    }

    /// Get the git source if this is a remote reference
    #[cfg(test)]
    pub fn as_git(&self) -> Option<&GitSource> {
        match self {
            PackageReference::Remote(git) => Some(git),
            PackageReference::Local { .. } => None,
        }
    }
}

impl fmt::Display for PackageReference {
    /// Show exactly where a package comes from, even for shorthand input
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageReference::Local { path } => write!(f, "{}", path.display()),
            PackageReference::Remote(git) => {
                write!(f, "{}", git.url)?;
                if let Some(git_ref) = &git.git_ref {
                    write!(f, "#{git_ref}")?;
                }
                if let Some(path) = &git.path {
                    write!(f, " ({path})")?;
                }
                Ok(())
            }
        }
    }
}
