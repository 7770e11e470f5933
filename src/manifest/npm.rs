//! npm packages (`package.json`)
//!
//! Only `dependencies` count, not `devDependencies`. Version ranges are
//! satisfied from an installed `node_modules` tree, never from the registry.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, manifest as manifest_error};
use crate::source::{GitSource, PackageReference};

use super::{
    DeclaredDependency, DependencySource, ManifestBackend, ManifestKind, PackageManifest,
    local_reference, read_manifest_file,
};

const PACKAGE_JSON: &str = "package.json";

/// Backend for `package.json`
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmBackend;

#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

/// Whether a dependency spec points at a git repository
fn is_git_spec(spec: &str) -> bool {
    if ["git+", "git://", "git@", "github:"]
        .iter()
        .any(|prefix| spec.starts_with(prefix))
    {
        return true;
    }
    let main = spec.split_once('#').map_or(spec, |(main, _)| main);
    if main.starts_with("https://") || main.starts_with("http://") {
        return main.ends_with(".git");
    }
    // owner/repo shorthand
    let mut parts = main.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(repo), None)
            if !owner.is_empty()
                && !repo.is_empty()
                && !owner.starts_with(['@', '.'])
                && !main.contains([':', ' '])
    )
}

/// Installed copy of `name`, searching `node_modules` upward from `dir`
fn installed(dir: &Path, name: &str) -> Option<DependencySource> {
    dir.ancestors()
        .map(|ancestor| ancestor.join("node_modules").join(name))
        .find(|candidate| candidate.is_dir())
        .map(|path| DependencySource::Reference(PackageReference::local(path)))
}

fn source_for(dir: &Path, name: &str, spec: &str) -> DependencySource {
    let spec = spec.trim();
    if let Some(path) = spec
        .strip_prefix("file:")
        .or_else(|| spec.strip_prefix("link:"))
    {
        return local_reference(dir, path);
    }
    if is_git_spec(spec) {
        return match GitSource::parse(spec) {
            Ok(source) => DependencySource::Reference(PackageReference::Remote(source)),
            Err(e) => DependencySource::Unresolvable(e.to_string()),
        };
    }
    installed(dir, name).unwrap_or_else(|| {
        DependencySource::Unresolvable(format!("{name}@{spec} is not installed in node_modules"))
    })
}

impl ManifestBackend for NpmBackend {
    fn kind(&self) -> ManifestKind {
        ManifestKind::Npm
    }

    fn marker(&self) -> &'static str {
        PACKAGE_JSON
    }

    fn read(&self, dir: &Path) -> Result<PackageManifest> {
        let (path, content) = read_manifest_file(dir, PACKAGE_JSON)?;
        let package: PackageJson = serde_json::from_str(&content)
            .map_err(|e| manifest_error::parse_failed(path.display().to_string(), e.to_string()))?;

        let declared = package
            .dependencies
            .iter()
            .map(|(name, spec)| DeclaredDependency::new(name.clone(), source_for(dir, name, spec)))
            .collect();

        Ok(PackageManifest::new(package.name, declared))
    }
}
