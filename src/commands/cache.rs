//! Cache command implementation

use std::path::{Path, PathBuf};

use console::Style;

use crate::cache::{self, CacheStats};
use crate::cli::{CacheArgs, CacheSubcommand};
use crate::error::Result;

use super::helpers::resolve_cache_dir;

pub fn run(cache_dir: Option<PathBuf>, args: CacheArgs) -> Result<()> {
    let root = resolve_cache_dir(cache_dir)?;

    match args.command {
        Some(CacheSubcommand::List) => list_cached_packages(&root),
        Some(CacheSubcommand::Clear(clear_args)) => match clear_args.only {
            Some(key) => clean_specific_entry(&root, &key),
            None => clean_all_cache(&root),
        },
        // Default: show only cache statistics
        None => show_cache_stats(&root),
    }
}

fn print_stats(root: &Path, stats: &CacheStats) {
    println!("Cache Statistics:");
    println!("  Location: {}", root.display());
    println!("  Packages: {}", stats.entries);
    if stats.incomplete > 0 {
        println!(
            "  Incomplete: {}",
            Style::new().yellow().apply_to(stats.incomplete)
        );
    }
    println!("  Size: {}", stats.formatted_size());
}

fn show_cache_stats(root: &Path) -> Result<()> {
    let stats = cache::stats::cache_stats(root)?;
    print_stats(root, &stats);

    if stats.entries + stats.incomplete == 0 {
        println!("\nCache is empty.");
    } else {
        println!("\nRun 'tythe cache list' to list cached packages.");
        println!("Run 'tythe cache clear' to remove everything from cache.");
        println!("Run 'tythe cache clear --only <key>' to remove a specific entry.");
    }
    Ok(())
}

fn list_cached_packages(root: &Path) -> Result<()> {
    let stats = cache::stats::cache_stats(root)?;
    print_stats(root, &stats);
    println!();

    let entries = cache::stats::list_entries(root)?;
    if entries.is_empty() {
        println!("No cached packages.");
        return Ok(());
    }

    println!("Cached packages ({}):", entries.len());
    for entry in &entries {
        println!("  {} ({})", entry.key, entry.formatted_size());
        match (&entry.url, &entry.sha) {
            (Some(url), Some(sha)) => {
                println!("    URL: {url}");
                if let Some(git_ref) = &entry.git_ref {
                    println!("    Ref: {git_ref}");
                }
                println!("    Commit: {sha}");
            }
            _ => println!(
                "    {}",
                Style::new()
                    .yellow()
                    .apply_to("incomplete: interrupted fetch, clear it to retry")
            ),
        }
    }
    Ok(())
}

fn clean_all_cache(root: &Path) -> Result<()> {
    cache::stats::clear_cache(root)?;
    println!("Cache cleared successfully.");
    Ok(())
}

fn clean_specific_entry(root: &Path, key: &str) -> Result<()> {
    cache::stats::remove_entry(root, key)?;
    println!("Removed cache entry: {key}");
    Ok(())
}
