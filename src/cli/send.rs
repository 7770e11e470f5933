use clap::{Parser, ValueEnum};

use crate::domain::PaymentMethod;

use super::{PaymentArgs, parse_amount};

/// Payment method for the send command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodArg {
    #[default]
    Usdc,
    Paypal,
}

impl From<MethodArg> for PaymentMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Usdc => PaymentMethod::Usdc,
            MethodArg::Paypal => PaymentMethod::PayPal,
        }
    }
}

/// Arguments for the send command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Send 5 USDC:\n    tythe send 0x52908400098527886E0F7030069857D2E4169EE7 5\n\n\
                  Send $5 over PayPal in the sandbox:\n    tythe send dev@example.com 5 --method paypal --sandbox")]
pub struct SendArgs {
    /// USDC address or PayPal account
    pub address: String,

    /// Amount in USD
    #[arg(value_parser = parse_amount)]
    pub amount: f64,

    /// Payment method
    #[arg(long, value_enum, default_value_t = MethodArg::Usdc)]
    pub method: MethodArg,

    #[command(flatten)]
    pub payment: PaymentArgs,
}
