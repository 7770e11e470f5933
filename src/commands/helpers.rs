//! Command helper utilities
//!
//! Shared by the commands that crawl packages or move money: building the
//! crawler and payment router from CLI options, confirming, and printing
//! plans and payment results.

use std::path::PathBuf;

use console::{Style, Term};
use inquire::Confirm;

use crate::cache::paths::default_cache_dir;
use crate::cli::PaymentArgs;
use crate::crawler::DependencyCrawler;
use crate::distribution::DistributionPlan;
use crate::domain::PaymentMethod;
use crate::error::{Result, payment as payment_error};
use crate::payment::{CommandBackend, PaymentResult, PaymentRouter};
use crate::resolver::PackageResolver;
use crate::source::PackageReference;
use crate::ui::InteractiveProgressReporter;

/// Cache directory from `--cache-dir` / `TYTHE_CACHE_DIR`, else the default
pub fn resolve_cache_dir(cache_dir: Option<PathBuf>) -> Result<PathBuf> {
    match cache_dir {
        Some(path) => Ok(path),
        None => default_cache_dir(),
    }
}

pub fn parse_references(inputs: &[String]) -> Result<Vec<PackageReference>> {
    inputs.iter().map(|input| PackageReference::parse(input)).collect()
}

/// Crawler over the given cache, with a spinner when stderr is a terminal
///
/// The spinner is left out in verbose mode where it would interleave with
/// log lines.
pub fn build_crawler(cache_dir: PathBuf, verbose: bool) -> DependencyCrawler {
    let crawler = DependencyCrawler::new(PackageResolver::new(cache_dir));
    if !verbose && Term::stderr().is_term() {
        crawler.with_progress(Box::new(InteractiveProgressReporter::new()))
    } else {
        crawler
    }
}

/// Router with a command backend for each configured method
pub fn build_router(args: &PaymentArgs) -> Result<PaymentRouter> {
    let mut router = PaymentRouter::new();
    for (method, command) in [
        (PaymentMethod::Usdc, &args.usdc_command),
        (PaymentMethod::PayPal, &args.paypal_command),
    ] {
        if let Some(line) = command.as_deref().filter(|l| !l.trim().is_empty()) {
            router = router.with_backend(Box::new(CommandBackend::from_command_line(method, line)?));
        }
    }
    Ok(router)
}

pub fn format_usd(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Print the destinations of a plan, grouped by method
pub fn print_plan(plan: &DistributionPlan) {
    let bold = Style::new().bold();
    for (method, batch) in &plan.batches {
        println!("{}", bold.apply_to(format!("{method}:")));
        for (address, amount) in batch {
            println!(
                "  {}  {}",
                Style::new().green().apply_to(format!("{:>12}", format_usd(*amount))),
                address
            );
        }
    }
    println!();
    println!("{} {}", bold.apply_to("Total:"), format_usd(plan.spend));
    if plan.unspent() > 0.0 {
        println!(
            "{} {}",
            Style::new().dim().apply_to("Not distributed (no tythe.json):"),
            format_usd(plan.unspent())
        );
    }
}

/// Ask before sending; `--yes` skips the prompt
pub fn confirm_payment(amount: f64, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let prompt = format!("Really send {}?", format_usd(amount));
    Ok(Confirm::new(&prompt)
        .with_default(false)
        .with_help_message("Press 'y' to send, or Enter to cancel")
        .prompt()?)
}

/// Print one line per payment result
pub fn print_results(results: &[PaymentResult]) {
    for result in results {
        match &result.outcome {
            Ok(transaction_id) => println!(
                "  {} {} {} to {}  {}",
                Style::new().green().apply_to("✓"),
                result.method,
                format_usd(result.amount),
                result.address,
                Style::new().dim().apply_to(transaction_id)
            ),
            Err(error) => println!(
                "  {} {} {} to {}  {}",
                Style::new().red().apply_to("✗"),
                result.method,
                format_usd(result.amount),
                result.address,
                Style::new().red().apply_to(error)
            ),
        }
    }
}

/// Confirm and pay a plan, failing if any destination failed
pub fn execute_plan(plan: &DistributionPlan, args: &PaymentArgs) -> Result<()> {
    if plan.is_empty() {
        println!("Nothing to pay.");
        return Ok(());
    }
    let router = build_router(args)?;
    for method in plan.batches.keys() {
        if !router.has_backend(*method) {
            eprintln!(
                "{} no payment backend configured for {method}; set --{}-command",
                Style::new().yellow().bold().apply_to("Warning:"),
                method.as_arg()
            );
        }
    }
    if !confirm_payment(plan.spend, args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let results = router.route(plan, args.sandbox);
    println!();
    println!(
        "{}",
        Style::new().bold().apply_to(if args.sandbox {
            "Payments (sandbox):"
        } else {
            "Payments:"
        })
    );
    print_results(&results);

    let failed = results.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        return Err(payment_error::incomplete(failed, results.len()));
    }
    Ok(())
}
