//! Payment destinations
//!
//! A destination is an address for one payment method. The method is decided
//! by the kind of address, never passed separately.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, payment as payment_error};

/// Supported payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// USDC stablecoin transfer to an Ethereum-style address
    Usdc,
    /// PayPal transfer to an account e-mail
    PayPal,
}

impl PaymentMethod {
    /// Lowercase name used on the command line and in backend environments
    pub fn as_arg(self) -> &'static str {
        match self {
            PaymentMethod::Usdc => "usdc",
            PaymentMethod::PayPal => "paypal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Usdc => write!(f, "USDC"),
            PaymentMethod::PayPal => write!(f, "PayPal"),
        }
    }
}

/// Where a payment goes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "method", content = "address", rename_all = "lowercase")]
pub enum Destination {
    Usdc(String),
    PayPal(String),
}

impl Destination {
    /// Validated USDC destination
    ///
    /// Stored in lowercase: checksum casing does not change the account.
    pub fn usdc(address: &str) -> Result<Self> {
        let address = address.trim();
        if is_valid_usdc_address(address) {
            Ok(Destination::Usdc(address.to_ascii_lowercase()))
        } else {
            Err(payment_error::invalid_address(
                PaymentMethod::Usdc.to_string(),
                address,
            ))
        }
    }

    /// Validated PayPal destination, with the e-mail address lowercased
    pub fn paypal(account: &str) -> Result<Self> {
        let account = account.trim();
        if is_valid_paypal_account(account) {
            Ok(Destination::PayPal(account.to_lowercase()))
        } else {
            Err(payment_error::invalid_address(
                PaymentMethod::PayPal.to_string(),
                account,
            ))
        }
    }

    pub fn method(&self) -> PaymentMethod {
        match self {
            Destination::Usdc(_) => PaymentMethod::Usdc,
            Destination::PayPal(_) => PaymentMethod::PayPal,
        }
    }

    pub fn address(&self) -> &str {
        match self {
            Destination::Usdc(address) | Destination::PayPal(address) => address,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.address())
    }
}

/// `0x` followed by 40 hex digits
pub fn is_valid_usdc_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// An e-mail address: one `@`, a local part, and a dotted domain
pub fn is_valid_paypal_account(account: &str) -> bool {
    let Some((local, domain)) = account.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !account.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
