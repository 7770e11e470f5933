//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - list: List command arguments
//! - distribute: Distribute command arguments
//! - pay: Pay command arguments
//! - send: Send command arguments
//! - cache: Cache command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod cache;
pub mod completions;
pub mod distribute;
pub mod list;
pub mod pay;
pub mod send;

pub use cache::{CacheArgs, CacheSubcommand};
pub use completions::CompletionsArgs;
pub use distribute::DistributeArgs;
pub use list::ListArgs;
pub use pay::PayArgs;
pub use send::SendArgs;

/// tythe - share a donation across your dependencies
///
/// Crawl a package's dependencies, find the ones that accept donations and
/// split a payment between them.
#[derive(Parser, Debug)]
#[command(
    name = "tythe",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Donate to the dependencies your project is built on",
    long_about = "tythe crawls the dependency graph of Go, Cargo and npm packages, finds \
                  dependencies that publish a tythe.json and splits a donation between them \
                  in USDC or PayPal.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  tythe list .                                 \x1b[90m# Show dependencies and who accepts donations\x1b[0m\n   \
                  tythe distribute . --amount 100 --dry-run    \x1b[90m# Preview how $100 would be split\x1b[0m\n   \
                  tythe pay github.com/owner/repo 10          \x1b[90m# Pay one package directly\x1b[0m\n   \
                  tythe cache                                  \x1b[90m# Show package cache statistics\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Package cache directory
    #[arg(long, global = true, env = "TYTHE_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the transitive dependencies of packages
    List(ListArgs),

    /// Split an amount across the dependencies of packages
    Distribute(DistributeArgs),

    /// Pay one package according to its own tythe.json
    Pay(PayArgs),

    /// Send an amount to an address
    Send(SendArgs),

    /// Manage the package cache
    #[command(name = "cache")]
    Cache(CacheArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by commands that move money
#[derive(Args, Debug, Clone, Default)]
pub struct PaymentArgs {
    /// Use the payment providers' sandbox environments
    #[arg(long)]
    pub sandbox: bool,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Command performing USDC transfers: `<command> <address> <amount>`
    #[arg(long, env = "TYTHE_USDC_COMMAND", value_name = "COMMAND")]
    pub usdc_command: Option<String>,

    /// Command performing PayPal transfers: `<command> <account> <amount>`
    #[arg(long, env = "TYTHE_PAYPAL_COMMAND", value_name = "COMMAND")]
    pub paypal_command: Option<String>,
}

/// Parse a non-negative dollar amount such as `25`, `12.50` or `$5`
pub fn parse_amount(input: &str) -> Result<f64, String> {
    let trimmed = input.trim();
    let number = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let amount: f64 = number
        .parse()
        .map_err(|_| format!("'{input}' is not a number"))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("'{input}' is not a valid amount"));
    }
    Ok(amount)
}
