//! Pay command implementation
//!
//! Pays one package directly, to the destination in its own tythe.json.
//! Its dependencies are not crawled.

use std::path::PathBuf;

use console::Style;

use crate::cli::PayArgs;
use crate::config::read_config;
use crate::distribution::DistributionPlan;
use crate::error::Result;
use crate::resolver::PackageResolver;
use crate::source::PackageReference;

use super::helpers::{execute_plan, print_plan, resolve_cache_dir};

/// Run pay command
pub fn run(cache_dir: Option<PathBuf>, args: PayArgs) -> Result<()> {
    let reference = PackageReference::parse(&args.package)?;
    let resolver = PackageResolver::new(resolve_cache_dir(cache_dir)?);
    let package = resolver.resolve(&reference)?;

    let Some(config) = read_config(&package.directory)? else {
        println!("no tythe.json for package: {reference}");
        return Ok(());
    };
    let Some(destination) = config.destination() else {
        println!("no tythe.json for package: {reference}");
        return Ok(());
    };

    println!(
        "Found tythe.json in {}:",
        Style::new().bold().yellow().apply_to(&package.identity)
    );
    if let Ok(json) = serde_json::to_string_pretty(&config) {
        println!("{json}");
    }
    println!();

    let plan = DistributionPlan::single(destination, args.amount)?;
    print_plan(&plan);
    if args.dry_run {
        println!();
        println!("Dry run, nothing was sent.");
        return Ok(());
    }
    println!();
    execute_plan(&plan, &args.payment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PaymentArgs;
    use crate::error::TytheError;
    use tempfile::TempDir;

    fn args(pkg: &std::path::Path) -> PayArgs {
        PayArgs {
            package: pkg.display().to_string(),
            amount: 5.0,
            dry_run: true,
            payment: PaymentArgs::default(),
        }
    }

    #[test]
    fn test_pay_without_config_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(run(Some(temp.path().join("cache")), args(temp.path())).is_ok());
    }

    #[test]
    fn test_pay_invalid_config_fails() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("tythe.json"), r#"{"usdcAddress": "nope"}"#).unwrap();
        let result = run(Some(temp.path().join("cache")), args(temp.path()));
        assert!(matches!(result, Err(TytheError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_pay_dry_run() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("tythe.json"),
            r#"{"usdcAddress": "0x52908400098527886E0F7030069857D2E4169EE7"}"#,
        )
        .unwrap();
        assert!(run(Some(temp.path().join("cache")), args(temp.path())).is_ok());
    }
}
