//! List command implementation
//!
//! Crawls the given packages and prints every transitive dependency with its
//! donation destination, followed by anything that could not be crawled.

use std::path::PathBuf;

use console::Style;

use crate::cli::ListArgs;
use crate::crawler::{CrawlReport, RootPackage};
use crate::domain::Dependency;
use crate::error::Result;

use super::helpers::{build_crawler, parse_references, resolve_cache_dir};

/// Run list command
pub fn run(cache_dir: Option<PathBuf>, verbose: bool, args: ListArgs) -> Result<()> {
    let references = parse_references(&args.packages)?;
    let crawler = build_crawler(resolve_cache_dir(cache_dir)?, verbose);
    let report = crawler.crawl(&references)?;
    print_report(&report, args.detailed);
    Ok(())
}

fn destination_label(config_destination: Option<crate::domain::Destination>) -> String {
    match config_destination {
        Some(destination) => Style::new().green().apply_to(destination).to_string(),
        None => Style::new().dim().apply_to("no tythe.json").to_string(),
    }
}

fn print_root(root: &RootPackage) {
    println!(
        "{} {}  {}",
        Style::new().bold().apply_to("Package:"),
        Style::new().bold().yellow().apply_to(&root.identity),
        destination_label(root.config.as_ref().and_then(|c| c.destination()))
    );
}

fn print_dependency(dep: &Dependency, detailed: bool) {
    println!(
        "  {}  {}",
        Style::new().yellow().apply_to(&dep.identity),
        destination_label(dep.destination())
    );
    if detailed {
        let bold = Style::new().bold();
        println!("    {} {}", bold.apply_to("Required by:"), dep.required_by);
        println!(
            "    {} {}",
            bold.apply_to("Directory:"),
            dep.package.directory.display()
        );
        if let Some(sha) = &dep.package.sha {
            println!("    {} {}", bold.apply_to("Commit:"), sha);
        }
        if let Some(ecosystem) = dep.ecosystem {
            println!("    {} {}", bold.apply_to("Ecosystem:"), ecosystem);
        }
    }
}

fn print_report(report: &CrawlReport, detailed: bool) {
    for root in &report.roots {
        print_root(root);
    }
    println!();

    let tythed = report.tythed().count();
    if report.dependencies.is_empty() {
        println!("No dependencies found.");
    } else {
        println!(
            "Dependencies ({}, {} accepting donations):",
            report.dependencies.len(),
            tythed
        );
        for dep in &report.dependencies {
            print_dependency(dep, detailed);
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!(
            "{}",
            Style::new()
                .red()
                .bold()
                .apply_to(format!("Not crawled ({}):", report.failures.len()))
        );
        for failure in &report.failures {
            match &failure.required_by {
                Some(parent) => println!(
                    "  {} (required by {}): {}",
                    failure.identity, parent, failure.error
                ),
                None => println!("  {}: {}", failure.identity, failure.error),
            }
        }
    }
}
