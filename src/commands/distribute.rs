//! Distribute command implementation
//!
//! Crawl, split the amount over the dependencies, show the plan, then pay it.

use std::path::PathBuf;

use console::Style;
use tracing::info;

use crate::cli::DistributeArgs;
use crate::distribution::{self, flat_weight};
use crate::error::Result;

use super::helpers::{
    build_crawler, execute_plan, format_usd, parse_references, print_plan, resolve_cache_dir,
};

/// Run distribute command
pub fn run(cache_dir: Option<PathBuf>, verbose: bool, args: DistributeArgs) -> Result<()> {
    let references = parse_references(&args.packages)?;
    let crawler = build_crawler(resolve_cache_dir(cache_dir)?, verbose);
    let report = crawler.crawl(&references)?;

    if !report.failures.is_empty() {
        eprintln!(
            "{} {} package(s) could not be crawled and are left out:",
            Style::new().yellow().bold().apply_to("Warning:"),
            report.failures.len()
        );
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.identity, failure.error);
        }
    }

    let plan = distribution::compute(&report.dependencies, args.amount, flat_weight)?;
    info!(
        dependencies = report.dependencies.len(),
        tythed = report.tythed().count(),
        spend = plan.spend,
        "distribution planned"
    );

    println!(
        "Distributing {} across {} dependencies ({} accept donations):",
        format_usd(args.amount),
        report.dependencies.len(),
        report.tythed().count()
    );
    println!();
    print_plan(&plan);

    if args.dry_run {
        println!();
        println!("Dry run, nothing was sent.");
        return Ok(());
    }
    println!();
    execute_plan(&plan, &args.payment)
}
