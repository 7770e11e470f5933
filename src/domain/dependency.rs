//! Crawled dependency

use serde::Serialize;

use crate::config::DonationConfig;
use crate::manifest::ManifestKind;
use crate::resolver::ResolvedPackage;

use super::Destination;

/// One unique package reached while crawling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dependency {
    /// Identity as declared by the package that required it
    pub identity: String,
    /// Where the package was materialized
    pub package: ResolvedPackage,
    /// Donation config, `None` when absent or invalid
    pub config: Option<DonationConfig>,
    /// Identity of the package whose manifest declared this one first
    pub required_by: String,
    /// Manifest ecosystem of the package itself, if it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecosystem: Option<ManifestKind>,
}

impl Dependency {
    /// Destination payments for this dependency go to
    pub fn destination(&self) -> Option<Destination> {
        self.config.as_ref().and_then(DonationConfig::destination)
    }

    pub fn is_tythed(&self) -> bool {
        self.destination().is_some()
    }
}
