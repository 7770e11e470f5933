//! Package caching for tythe
//!
//! Remote packages are cloned once per (canonical repository URL, ref) into the cache
//! directory and reused by later crawls. See [`paths`] for the layout.
//!
//! Within one process, concurrent requests for the same entry are coalesced:
//! one thread clones, the others wait for it and share its result.

pub mod inflight;
pub mod paths;
pub mod populate;
pub mod stats;

use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, cache as cache_error};

use inflight::InFlight;
use paths::{entry_checkout_path, entry_key, entry_path};
use populate::{EntryMeta, populate_entry, read_marker};

pub use stats::CacheStats;

/// A repository checkout available in the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCheckout {
    /// Cache key of the entry
    pub key: String,
    /// Working tree of the checked out repository
    pub path: PathBuf,
    /// Commit that was checked out
    pub sha: String,
}

/// The on-disk package cache plus its in-process fetch registry
#[derive(Debug)]
pub struct PackageCache {
    root: PathBuf,
    in_flight: InFlight<Result<CachedCheckout>>,
}

impl PackageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            in_flight: InFlight::new(),
        }
    }

    /// Get a checkout of `url` at `git_ref`, cloning it on a cache miss
    pub fn fetch(&self, url: &str, git_ref: Option<&str>) -> Result<CachedCheckout> {
        let key = entry_key(url, git_ref);
        self.in_flight
            .run(&key, || self.fetch_uncoalesced(&key, url, git_ref))
    }

    fn fetch_uncoalesced(
        &self,
        key: &str,
        url: &str,
        git_ref: Option<&str>,
    ) -> Result<CachedCheckout> {
        if let Some(hit) = self.lookup(key)? {
            debug!(key, sha = %hit.sha, "cache hit");
            return Ok(hit);
        }
        let meta = populate_entry(&self.root, key, url, git_ref)?;
        Ok(self.checkout_for(key, &meta))
    }

    /// Look up a completed entry
    ///
    /// An entry directory without a completion marker, or whose checkout is
    /// missing, is an interrupted fetch and is reported as an error rather
    /// than reused.
    pub fn lookup(&self, key: &str) -> Result<Option<CachedCheckout>> {
        let entry = entry_path(&self.root, key);
        if !entry.exists() {
            return Ok(None);
        }
        match read_marker(&entry)? {
            Some(meta) if entry_checkout_path(&entry).is_dir() => {
                Ok(Some(self.checkout_for(key, &meta)))
            }
            _ => Err(cache_error::entry_incomplete(
                entry.display().to_string(),
                key,
            )),
        }
    }

    fn checkout_for(&self, key: &str, meta: &EntryMeta) -> CachedCheckout {
        CachedCheckout {
            key: key.to_string(),
            path: entry_checkout_path(&entry_path(&self.root, key)),
            sha: meta.sha.clone(),
        }
    }
}
