//! tythe - donate to the dependencies your project is built on
//!
//! Crawls the dependency graph of a package, finds the dependencies that
//! publish a donation config (tythe.json) and splits a payment between them.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cache;
mod cli;
mod commands;
mod config;
mod crawler;
mod distribution;
mod domain;
mod error;
mod git;
mod manifest;
mod payment;
mod resolver;
mod source;
mod ui;

use cli::{Cli, Commands};

/// Log filter: `TYTHE_LOG` if set, else debug with `--verbose`, else warnings only
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TYTHE_LOG").unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::List(args) => commands::list::run(cli.cache_dir, cli.verbose, args),
        Commands::Distribute(args) => commands::distribute::run(cli.cache_dir, cli.verbose, args),
        Commands::Pay(args) => commands::pay::run(cli.cache_dir, args),
        Commands::Send(args) => commands::send::run(args),
        Commands::Cache(args) => commands::cache::run(cli.cache_dir, args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
