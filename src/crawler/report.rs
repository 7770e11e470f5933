//! Crawl results

use serde::Serialize;

use crate::config::DonationConfig;
use crate::domain::Dependency;
use crate::error::TytheError;
use crate::manifest::ManifestKind;
use crate::resolver::ResolvedPackage;

/// A package a crawl started from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootPackage {
    /// Declared manifest name, else the resolved identity
    pub identity: String,
    pub package: ResolvedPackage,
    pub config: Option<DonationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecosystem: Option<ManifestKind>,
}

/// A package that could not be crawled
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlFailure {
    pub identity: String,
    /// Package that declared it; `None` for a root
    pub required_by: Option<String>,
    pub error: TytheError,
}

/// Everything one crawl found
///
/// Dependencies and failures are sorted by identity. Roots keep the order
/// they were given in.
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub roots: Vec<RootPackage>,
    pub dependencies: Vec<Dependency>,
    pub failures: Vec<CrawlFailure>,
}

impl CrawlReport {
    /// Identities of all crawled dependencies
    #[cfg(test)]
    pub fn identities(&self) -> Vec<&str> {
        self.dependencies
            .iter()
            .map(|dep| dep.identity.as_str())
            .collect()
    }

    /// Dependencies with a usable donation destination
    pub fn tythed(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().filter(|dep| dep.is_tythed())
    }

    /// Whether every declared dependency was crawled
    #[cfg(test)]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
