use clap::Parser;

use super::{PaymentArgs, parse_amount};

/// Arguments for the distribute command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Preview a $100 donation across the current package's dependencies:\n    tythe distribute . --amount 100 --dry-run\n\n\
                  Donate using a wallet script, without prompting:\n    tythe distribute . --amount 100 --usdc-command ./send-usdc.sh --yes")]
pub struct DistributeArgs {
    /// Package references whose dependencies receive the donation
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Total amount in USD
    #[arg(long, value_parser = parse_amount, value_name = "USD")]
    pub amount: f64,

    /// Print the plan without paying
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub payment: PaymentArgs,
}
