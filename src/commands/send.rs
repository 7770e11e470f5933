//! Send command implementation

use crate::cli::SendArgs;
use crate::distribution::DistributionPlan;
use crate::domain::{Destination, PaymentMethod};
use crate::error::Result;

use super::helpers::{execute_plan, print_plan};

/// Run send command
pub fn run(args: SendArgs) -> Result<()> {
    let destination = match PaymentMethod::from(args.method) {
        PaymentMethod::Usdc => Destination::usdc(&args.address)?,
        PaymentMethod::PayPal => Destination::paypal(&args.address)?,
    };
    let plan = DistributionPlan::single(destination, args.amount)?;
    print_plan(&plan);
    println!();
    execute_plan(&plan, &args.payment)
}
