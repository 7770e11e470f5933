//! Dependency manifests
//!
//! Each supported ecosystem plugs in as a [`ManifestBackend`]. Backends only
//! read files: they never fetch anything. A declared dependency says where it
//! can be fetched from, and the crawler does the fetching.
//!
//! Supported ecosystems, in detection order:
//! - Go: `go.mod`
//! - Cargo: `Cargo.toml`
//! - npm: `package.json`

pub mod cargo;
pub mod golang;
pub mod npm;

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, manifest as manifest_error};
use crate::source::PackageReference;

pub use cargo::CargoBackend;
pub use golang::GoBackend;
pub use npm::NpmBackend;

/// Supported manifest ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    Go,
    Cargo,
    Npm,
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestKind::Go => write!(f, "go"),
            ManifestKind::Cargo => write!(f, "cargo"),
            ManifestKind::Npm => write!(f, "npm"),
        }
    }
}

/// Where a declared dependency can be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    /// Fetchable through the resolver
    Reference(PackageReference),
    /// Declared, but nothing local or git-hosted provides it
    Unresolvable(String),
}

/// One direct dependency declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub identity: String,
    pub source: DependencySource,
}

impl DeclaredDependency {
    pub fn new(identity: impl Into<String>, source: DependencySource) -> Self {
        Self {
            identity: identity.into(),
            source,
        }
    }
}

/// Parsed manifest of one package
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageManifest {
    /// Name the package declares for itself
    pub name: Option<String>,
    /// Direct dependencies in declaration order, without duplicates
    pub dependencies: Vec<DeclaredDependency>,
}

impl PackageManifest {
    /// Build a manifest, dropping self references and repeated identities
    pub fn new(name: Option<String>, declared: Vec<DeclaredDependency>) -> Self {
        let mut seen = HashSet::new();
        let dependencies = declared
            .into_iter()
            .filter(|dep| name.as_deref() != Some(dep.identity.as_str()))
            .filter(|dep| seen.insert(dep.identity.clone()))
            .collect();
        Self { name, dependencies }
    }
}

/// Reads the dependency manifest of one ecosystem
pub trait ManifestBackend: Send + Sync {
    fn kind(&self) -> ManifestKind;

    /// File whose presence marks a package of this ecosystem
    fn marker(&self) -> &'static str;

    /// Parse the manifest in `dir`
    fn read(&self, dir: &Path) -> Result<PackageManifest>;

    /// Locate the package `identity` inside a fetched repository
    fn package_dir(&self, checkout: &Path, _identity: &str) -> PathBuf {
        checkout.to_path_buf()
    }

    fn is_present(&self, dir: &Path) -> bool {
        dir.join(self.marker()).is_file()
    }
}

/// Read a backend's marker file from `dir`
pub(crate) fn read_manifest_file(dir: &Path, marker: &str) -> Result<(PathBuf, String)> {
    let path = dir.join(marker);
    let content = fs::read_to_string(&path)
        .map_err(|e| manifest_error::read_failed(path.display().to_string(), e.to_string()))?;
    Ok((path, content))
}

/// Local dependency path relative to the declaring package
pub(crate) fn local_reference(dir: &Path, relative: &str) -> DependencySource {
    DependencySource::Reference(PackageReference::local(dir.join(relative)))
}

/// Registry of manifest backends
pub struct ManifestRegistry {
    backends: Vec<Box<dyn ManifestBackend>>,
}

impl ManifestRegistry {
    pub fn new(backends: Vec<Box<dyn ManifestBackend>>) -> Self {
        Self { backends }
    }

    /// First backend whose marker file exists in `dir`
    pub fn detect(&self, dir: &Path) -> Option<&dyn ManifestBackend> {
        self.backends
            .iter()
            .find(|backend| backend.is_present(dir))
            .map(AsRef::as_ref)
    }

    pub fn get(&self, kind: ManifestKind) -> Option<&dyn ManifestBackend> {
        self.backends
            .iter()
            .find(|backend| backend.kind() == kind)
            .map(AsRef::as_ref)
    }
}

impl Default for ManifestRegistry {
    fn default() -> Self {
        Self::new(vec![
            Box::new(GoBackend),
            Box::new(CargoBackend),
            Box::new(NpmBackend),
        ])
    }
}

impl fmt::Debug for ManifestRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.backends.iter().map(|b| b.kind()))
            .finish()
    }
}
