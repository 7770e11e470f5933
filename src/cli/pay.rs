use clap::Parser;

use super::{PaymentArgs, parse_amount};

/// Arguments for the pay command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Pay $10 to a package:\n    tythe pay github.com/owner/repo 10\n\n\
                  Check where the money would go:\n    tythe pay ./vendor/lib 10 --dry-run")]
pub struct PayArgs {
    /// Package reference
    pub package: String,

    /// Amount in USD
    #[arg(value_parser = parse_amount)]
    pub amount: f64,

    /// Print the payment without making it
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub payment: PaymentArgs,
}
