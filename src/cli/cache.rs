use clap::{Parser, Subcommand};

/// Arguments for cache command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show cache statistics:\n    tythe cache\n\n\
                  List cached packages:\n    tythe cache list\n\n\
                  Clear all cached packages:\n    tythe cache clear\n\n\
                  Remove one entry:\n    tythe cache clear --only github.com-owner-repo-1a2b3c4d5e6f")]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: Option<CacheSubcommand>,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// List cached packages
    List,

    /// Clear cached packages
    Clear(ClearCacheArgs),
}

/// Arguments for cache clear command
#[derive(Parser, Debug)]
pub struct ClearCacheArgs {
    /// Remove only the entry with this key (see `tythe cache list`)
    #[arg(long, value_name = "KEY")]
    pub only: Option<String>,
}
