//! Cache statistics and management
//!
//! Listing, removing, and sizing cache entries for the `cache` command.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Result, cache as cache_error};

use super::paths::{entry_path, packages_dir};
use super::populate::read_marker;

/// One cache entry
#[derive(Debug, Clone)]
pub struct CachedPackage {
    /// Cache key (directory name)
    pub key: String,
    /// Repository URL, when the entry is complete
    pub url: Option<String>,
    /// Requested ref
    pub git_ref: Option<String>,
    /// Checked out commit, when the entry is complete
    pub sha: Option<String>,
    /// Total size in bytes
    pub size: u64,
}

impl CachedPackage {
    /// Whether a fetch finished writing this entry
    pub fn is_complete(&self) -> bool {
        self.sha.is_some()
    }

    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }
}

/// Cache statistics
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of complete entries
    pub entries: usize,
    /// Number of entries left behind by interrupted fetches
    pub incomplete: usize,
    /// Total size in bytes
    pub total_size: u64,
}

impl CacheStats {
    pub fn formatted_size(&self) -> String {
        format_size(self.total_size)
    }
}

/// Format a byte count as a human-readable string
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let size = bytes as f64;
    if size < KB {
        format!("{bytes} B")
    } else if size < KB * KB {
        format!("{:.1} KB", size / KB)
    } else if size < KB * KB * KB {
        format!("{:.1} MB", size / (KB * KB))
    } else {
        format!("{:.1} GB", size / (KB * KB * KB))
    }
}

fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// List all cache entries, sorted by key
pub fn list_entries(root: &Path) -> Result<Vec<CachedPackage>> {
    let packages = packages_dir(root);
    if !packages.is_dir() {
        return Ok(Vec::new());
    }

    let read_err =
        |e: std::io::Error| cache_error::operation_failed(format!("Failed to read cache directory: {e}"));

    let mut entries = Vec::new();
    for dir_entry in fs::read_dir(&packages).map_err(read_err)? {
        let path = dir_entry.map_err(read_err)?.path();
        if !path.is_dir() {
            continue;
        }
        let key = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        // A corrupt marker counts as incomplete rather than failing the listing
        let meta = read_marker(&path).ok().flatten();
        entries.push(CachedPackage {
            key,
            url: meta.as_ref().map(|m| m.url.clone()),
            git_ref: meta.as_ref().and_then(|m| m.git_ref.clone()),
            sha: meta.map(|m| m.sha),
            size: dir_size(&path),
        });
    }

    entries.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(entries)
}

/// Compute statistics over all cache entries
pub fn cache_stats(root: &Path) -> Result<CacheStats> {
    let entries = list_entries(root)?;
    let incomplete = entries.iter().filter(|e| !e.is_complete()).count();
    Ok(CacheStats {
        entries: entries.len() - incomplete,
        incomplete,
        total_size: entries.iter().map(|e| e.size).sum(),
    })
}

/// Remove one entry by key
pub fn remove_entry(root: &Path, key: &str) -> Result<()> {
    if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
        return Err(cache_error::operation_failed(format!(
            "Invalid cache key: {key}"
        )));
    }
    let path = entry_path(root, key);
    if !path.is_dir() {
        return Err(cache_error::operation_failed(format!(
            "No cache entry named {key}"
        )));
    }
    fs::remove_dir_all(&path).map_err(|e| {
        cache_error::operation_failed(format!("Failed to remove {}: {e}", path.display()))
    })
}

/// Remove every cache entry and any staged fetches
pub fn clear_cache(root: &Path) -> Result<()> {
    if !root.exists() {
        return Ok(());
    }
    for dir in [packages_dir(root), super::paths::staging_dir(root)] {
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| {
                cache_error::operation_failed(format!("Failed to remove {}: {e}", dir.display()))
            })?;
        }
    }
    Ok(())
}
