//! Cargo packages (`Cargo.toml`)
//!
//! Only `[dependencies]` count. Registry dependencies are never downloaded:
//! they resolve only when vendored under `vendor/<name>`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::{Result, manifest as manifest_error};
use crate::source::{GitSource, PackageReference};

use super::{
    DeclaredDependency, DependencySource, ManifestBackend, ManifestKind, PackageManifest,
    local_reference, read_manifest_file,
};

const CARGO_TOML: &str = "Cargo.toml";

/// How deep to search a fetched repository for a workspace member
const MEMBER_SEARCH_DEPTH: usize = 4;

/// Backend for `Cargo.toml`
#[derive(Debug, Clone, Copy, Default)]
pub struct CargoBackend;

#[derive(Debug, Deserialize)]
struct CargoManifest {
    #[serde(default)]
    package: Option<PackageSection>,
    #[serde(default)]
    dependencies: BTreeMap<String, CargoDependency>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CargoDependency {
    Version(String),
    Detailed(DetailedDependency),
}

#[derive(Debug, Default, Deserialize)]
struct DetailedDependency {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    git: Option<String>,
    #[serde(default)]
    rev: Option<String>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    package: Option<String>,
    #[serde(default)]
    workspace: bool,
}

fn parse_manifest(path: &Path, content: &str) -> Result<CargoManifest> {
    toml::from_str(content)
        .map_err(|e| manifest_error::parse_failed(path.display().to_string(), e.message()))
}

fn vendored_or_unresolvable(dir: &Path, name: &str, version: Option<&str>) -> DependencySource {
    let vendored = dir.join("vendor").join(name);
    if vendored.is_dir() {
        return DependencySource::Reference(PackageReference::local(vendored));
    }
    DependencySource::Unresolvable(format!(
        "registry dependency {name} {} is not vendored",
        version.unwrap_or("*")
    ))
}

fn source_for(dir: &Path, name: &str, dependency: &CargoDependency) -> DependencySource {
    let detail = match dependency {
        CargoDependency::Version(version) => {
            return vendored_or_unresolvable(dir, name, Some(version));
        }
        CargoDependency::Detailed(detail) => detail,
    };

    if let Some(path) = &detail.path {
        return local_reference(dir, path);
    }
    if let Some(url) = &detail.git {
        let mut source = GitSource::new(url.clone());
        if let Some(git_ref) = detail
            .rev
            .as_ref()
            .or(detail.tag.as_ref())
            .or(detail.branch.as_ref())
        {
            source = source.with_ref(git_ref.clone());
        }
        return DependencySource::Reference(PackageReference::Remote(source));
    }
    if detail.workspace {
        return DependencySource::Unresolvable(format!(
            "{name} is inherited from the workspace manifest"
        ));
    }
    vendored_or_unresolvable(dir, name, detail.version.as_deref())
}

/// Name declared by the `Cargo.toml` in `dir`, if it is a package manifest
fn package_name(dir: &Path) -> Option<String> {
    let (path, content) = read_manifest_file(dir, CARGO_TOML).ok()?;
    parse_manifest(&path, &content).ok()?.package.map(|p| p.name)
}

impl ManifestBackend for CargoBackend {
    fn kind(&self) -> ManifestKind {
        ManifestKind::Cargo
    }

    fn marker(&self) -> &'static str {
        CARGO_TOML
    }

    fn read(&self, dir: &Path) -> Result<PackageManifest> {
        let (path, content) = read_manifest_file(dir, CARGO_TOML)?;
        let manifest = parse_manifest(&path, &content)?;

        let declared = manifest
            .dependencies
            .iter()
            .map(|(key, dependency)| {
                let name = match dependency {
                    CargoDependency::Detailed(DetailedDependency {
                        package: Some(real), ..
                    }) => real.as_str(),
                    _ => key.as_str(),
                };
                DeclaredDependency::new(name, source_for(dir, name, dependency))
            })
            .collect();

        Ok(PackageManifest::new(
            manifest.package.map(|p| p.name),
            declared,
        ))
    }

    /// A git dependency may live anywhere in a workspace repository; find the
    /// member whose manifest declares `identity`
    fn package_dir(&self, checkout: &Path, identity: &str) -> PathBuf {
        if package_name(checkout).as_deref() == Some(identity) {
            return checkout.to_path_buf();
        }
        WalkDir::new(checkout)
            .max_depth(MEMBER_SEARCH_DEPTH)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                e.depth() == 0 || !(name.starts_with('.') || name == "target")
            })
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_dir())
            .find(|e| package_name(e.path()).as_deref() == Some(identity))
            .map_or_else(|| checkout.to_path_buf(), |e| e.path().to_path_buf())
    }
}
