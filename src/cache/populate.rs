//! Cache population
//!
//! A fetch clones into a private staging directory, writes the completion
//! marker and only then renames the whole entry into `packages/`. An entry
//! under `packages/` therefore either has a marker or was left behind by
//! something other than a completed fetch.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, TytheError, cache as cache_error};
use crate::git;

use super::paths::{
    entry_checkout_path, entry_marker_path, entry_path, packages_dir, staging_dir,
};

/// Contents of the completion marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    pub url: String,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    pub sha: String,
}

/// Read the completion marker of an entry, `None` if it has none
pub fn read_marker(entry: &Path) -> Result<Option<EntryMeta>> {
    let marker = entry_marker_path(entry);
    if !marker.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&marker).map_err(|e| {
        cache_error::operation_failed(format!("Failed to read {}: {e}", marker.display()))
    })?;
    let meta = serde_json::from_str(&content).map_err(|e| {
        cache_error::operation_failed(format!("Corrupt marker {}: {e}", marker.display()))
    })?;
    Ok(Some(meta))
}

fn write_marker(entry: &Path, meta: &EntryMeta) -> Result<()> {
    let marker = entry_marker_path(entry);
    let content = serde_json::to_string_pretty(meta)
        .map_err(|e| cache_error::operation_failed(format!("Failed to serialize marker: {e}")))?;
    fs::write(&marker, content).map_err(|e| {
        cache_error::operation_failed(format!("Failed to write {}: {e}", marker.display()))
    })
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        cache_error::operation_failed(format!(
            "Cache directory {} is not writable: {e}",
            path.display()
        ))
    })
}

/// Fetch `url` at `git_ref` into the cache entry `key`
///
/// Returns the marker of the entry now in place. If another process completed
/// the same entry first, its marker is returned instead.
pub fn populate_entry(
    root: &Path,
    key: &str,
    url: &str,
    git_ref: Option<&str>,
) -> Result<EntryMeta> {
    let packages = packages_dir(root);
    let staging = staging_dir(root);
    create_dir(&packages)?;
    create_dir(&staging)?;

    // Dropping the temp dir removes whatever a failed fetch left behind
    let temp = tempfile::TempDir::new_in(&staging).map_err(|e| {
        cache_error::operation_failed(format!("Failed to create staging directory: {e}"))
    })?;
    let staged_entry = temp.path().join("entry");
    create_dir(&staged_entry)?;

    info!(url, git_ref, "fetching package");
    let sha = git::clone_at(url, git_ref, &entry_checkout_path(&staged_entry))?;
    let meta = EntryMeta {
        url: url.to_string(),
        git_ref: git_ref.map(str::to_string),
        sha,
    };
    write_marker(&staged_entry, &meta)?;

    let target = entry_path(root, key);
    match fs::rename(&staged_entry, &target) {
        Ok(()) => {
            debug!(key, sha = %meta.sha, "cache entry committed");
            Ok(meta)
        }
        Err(rename_err) => match read_marker(&target)? {
            Some(existing) => {
                debug!(key, "cache entry completed concurrently");
                Ok(existing)
            }
            None => Err(TytheError::CacheOperationFailed {
                message: format!(
                    "Failed to move fetched package into {}: {rename_err}",
                    target.display()
                ),
            }),
        },
    }
}
