//! Cache path utilities and constants
//!
//! ## Cache Structure
//!
//! ```text
//! ~/.cache/tythe/
//! ├── .staging/                  # in-progress fetches, renamed into place when complete
//! └── packages/
//!     └── <slug>-<digest>/       # one entry per (canonical repository URL, ref)
//!         ├── .tythe_entry.json  # completion marker: url, ref, resolved sha
//!         └── checkout/          # the repository working tree
//! ```

use std::path::{Path, PathBuf};

use crate::error::{Result, cache as cache_error};
use crate::source::git_source::canonical_url;

/// Default cache directory name under the user's cache directory
const CACHE_DIR: &str = "tythe";

/// Packages subdirectory within the cache
pub const PACKAGES_DIR: &str = "packages";

/// Staging subdirectory for fetches that have not completed yet
pub const STAGING_DIR: &str = ".staging";

/// Completion marker written as the last step of a fetch
pub const ENTRY_MARKER: &str = ".tythe_entry.json";

/// Subdirectory holding the checked out repository
pub const CHECKOUT_DIR: &str = "checkout";

/// Length of the hex digest suffix in entry keys
const DIGEST_LEN: usize = 12;

/// Get the default cache directory path
///
/// Uses the platform's standard cache location with a `tythe` subdirectory.
/// The CLI lets `--cache-dir` / `TYTHE_CACHE_DIR` override it.
pub fn default_cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir()
        .ok_or_else(|| cache_error::operation_failed("Could not determine cache directory"))?;
    Ok(base.join(CACHE_DIR))
}

/// Packages directory inside a cache root
pub fn packages_dir(root: &Path) -> PathBuf {
    root.join(PACKAGES_DIR)
}

/// Staging directory inside a cache root
pub fn staging_dir(root: &Path) -> PathBuf {
    root.join(STAGING_DIR)
}

/// Human-readable, path-safe form of a repository URL
///
/// Example: `https://github.com/author/repo.git` -> `github.com-author-repo`
pub fn url_to_slug(url: &str) -> String {
    let slug: String = canonical_url(url)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug.trim_matches(|c| c == '-' || c == '.');
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug.to_string()
    }
}

/// Cache key for a repository at a ref
///
/// Keyed on the canonical repository URL, so every spelling of one repository
/// (scheme, user, `.git` suffix, trailing slash) shares an entry. The slug
/// keeps entries recognizable; the BLAKE3 digest of the canonical URL and ref
/// keeps different refs (and URLs that slug identically) apart.
pub fn entry_key(url: &str, git_ref: Option<&str>) -> String {
    let canonical = canonical_url(url);
    let mut hasher = blake3::Hasher::new();
    hasher.update(canonical.as_bytes());
    hasher.update(b"#");
    hasher.update(git_ref.unwrap_or("").as_bytes());
    let digest = hasher.finalize().to_hex();
    format!("{}-{}", url_to_slug(url), &digest[..DIGEST_LEN])
}

/// Entry directory for a key
pub fn entry_path(root: &Path, key: &str) -> PathBuf {
    packages_dir(root).join(key)
}

/// Checkout directory inside an entry
pub fn entry_checkout_path(entry: &Path) -> PathBuf {
    entry.join(CHECKOUT_DIR)
}

/// Marker file inside an entry
pub fn entry_marker_path(entry: &Path) -> PathBuf {
    entry.join(ENTRY_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_to_slug() {
        assert_eq!(
            url_to_slug("https://github.com/author/repo.git"),
            "github.com-author-repo"
        );
        assert_eq!(
            url_to_slug("git@github.com:author/repo.git"),
            "github.com-author-repo"
        );
        assert_eq!(url_to_slug("file:///tmp/some repo"), "tmp-some-repo");
        assert_eq!(url_to_slug(":::"), "unknown");
    }

    #[test]
    fn test_entry_key_depends_on_ref() {
        let url = "https://github.com/author/repo.git";
        let head = entry_key(url, None);
        let tagged = entry_key(url, Some("v1.0.0"));
        assert_ne!(head, tagged);
        assert!(head.starts_with("github.com-author-repo-"));
        assert_eq!(head, entry_key(url, None));
    }

    #[test]
    fn test_entry_key_shared_by_spellings() {
        let key = entry_key("https://github.com/author/repo.git", Some("v1"));
        for spelling in [
            "https://github.com/author/repo",
            "https://github.com/author/repo/",
            "git+https://github.com/author/repo.git",
            "git@github.com:author/repo.git",
            "ssh://git@github.com/author/repo",
            "https://GitHub.com/author/repo",
        ] {
            assert_eq!(entry_key(spelling, Some("v1")), key, "{spelling}");
        }
        assert_ne!(entry_key("https://github.com/author/other", Some("v1")), key);
    }

    #[test]
    fn test_entry_key_is_path_safe() {
        let key = entry_key("file://C:\\Users\\RUNNER~1\\Temp\\repo", Some("main"));
        assert!(!key.contains('\\'));
        assert!(!key.contains(':'));
        assert!(!key.contains('/'));
    }

    #[test]
    fn test_entry_layout() {
        let root = Path::new("/cache");
        let entry = entry_path(root, "key");
        assert_eq!(entry, Path::new("/cache/packages/key"));
        assert_eq!(entry_checkout_path(&entry), Path::new("/cache/packages/key/checkout"));
        assert_eq!(
            entry_marker_path(&entry),
            Path::new("/cache/packages/key/.tythe_entry.json")
        );
    }
}
