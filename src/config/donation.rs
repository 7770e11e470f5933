//! Donation config (tythe.json) data structures and reader

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Destination;
use crate::domain::destination::{is_valid_paypal_account, is_valid_usdc_address};
use crate::error::{Result, config as config_error};

/// Config file names, in order of preference
pub const CONFIG_FILES: [&str; 3] = ["tythe.json", "tythe.yaml", "tythe.yml"];

/// Where a package wants donations sent
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usdc_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paypal_account: Option<String>,
}

/// On-disk shape, current keys plus the legacy `destination` object
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default, alias = "usdc_address")]
    usdc_address: Option<String>,
    #[serde(default, alias = "paypal_account")]
    paypal_account: Option<String>,
    #[serde(default)]
    destination: Option<LegacyDestination>,
}

#[derive(Debug, Deserialize)]
struct LegacyDestination {
    #[serde(rename = "type")]
    kind: String,
    address: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl DonationConfig {
    /// Parse a config from JSON, `path` is used in error messages
    pub fn from_json(content: &str, path: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(content)
            .map_err(|e| config_error::parse_failed(path, e.to_string()))?;
        Self::from_raw(raw, path)
    }

    /// Parse a config from YAML, `path` is used in error messages
    pub fn from_yaml(content: &str, path: &str) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(content)
            .map_err(|e| config_error::parse_failed(path, e.to_string()))?;
        Self::from_raw(raw, path)
    }

    fn from_raw(raw: RawConfig, path: &str) -> Result<Self> {
        let mut config = Self {
            usdc_address: non_empty(raw.usdc_address),
            paypal_account: non_empty(raw.paypal_account),
        };

        if let Some(legacy) = raw.destination {
            let slot = match legacy.kind.to_ascii_lowercase().as_str() {
                "usdc" => &mut config.usdc_address,
                "paypal" => &mut config.paypal_account,
                other => {
                    return Err(config_error::invalid(
                        path,
                        format!("unknown destination type '{other}'"),
                    ));
                }
            };
            if slot.is_none() {
                *slot = non_empty(Some(legacy.address));
            }
        }

        config.validate(path)?;
        Ok(config)
    }

    /// Check that at least one destination is set and every set one is well formed
    pub fn validate(&self, path: &str) -> Result<()> {
        if self.usdc_address.is_none() && self.paypal_account.is_none() {
            return Err(config_error::invalid(
                path,
                "neither usdcAddress nor paypalAccount is set",
            ));
        }
        if let Some(address) = &self.usdc_address {
            if !is_valid_usdc_address(address) {
                return Err(config_error::invalid(
                    path,
                    format!("'{address}' is not a USDC address"),
                ));
            }
        }
        if let Some(account) = &self.paypal_account {
            if !is_valid_paypal_account(account) {
                return Err(config_error::invalid(
                    path,
                    format!("'{account}' is not a PayPal account e-mail"),
                ));
            }
        }
        Ok(())
    }

    /// Destination to pay, USDC taking precedence over PayPal
    pub fn destination(&self) -> Option<Destination> {
        self.usdc_address
            .as_deref()
            .and_then(|a| Destination::usdc(a).ok())
            .or_else(|| {
                self.paypal_account
                    .as_deref()
                    .and_then(|a| Destination::paypal(a).ok())
            })
    }
}

/// First config file present in `dir`
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Read the donation config of the package at `dir`
///
/// Returns `Ok(None)` when the package has no config file.
pub fn read_config(dir: &Path) -> Result<Option<DonationConfig>> {
    let Some(path) = find_config_file(dir) else {
        return Ok(None);
    };
    let path_str = path.display().to_string();
    let content = fs::read_to_string(&path)
        .map_err(|e| config_error::read_failed(&path_str, e.to_string()))?;

    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => DonationConfig::from_json(&content, &path_str)?,
        _ => DonationConfig::from_yaml(&content, &path_str)?,
    };
    debug!(path = %path_str, "read donation config");
    Ok(Some(config))
}
