//! Dependency crawling
//!
//! Walks the dependency graph from one or more roots and produces one
//! [`Dependency`] per unique identity. Children of a package are crawled in
//! parallel on the rayon pool. A shared visited set makes every identity
//! crawled at most once, which also terminates cycles.
//!
//! Failures are collected rather than propagated: a dependency that cannot
//! be resolved is reported and its siblings keep going.

pub mod report;

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{DonationConfig, read_config};
use crate::domain::Dependency;
use crate::error::{Result, TytheError, resolution};
use crate::manifest::{
    DeclaredDependency, DependencySource, ManifestBackend, ManifestRegistry,
};
use crate::resolver::PackageResolver;
use crate::source::PackageReference;
use crate::ui::{ProgressReporter, SilentProgressReporter};

pub use report::{CrawlFailure, CrawlReport, RootPackage};

/// Shared state of one crawl
#[derive(Default)]
struct CrawlState {
    visited: Mutex<HashSet<String>>,
    dependencies: Mutex<Vec<Dependency>>,
    failures: Mutex<Vec<CrawlFailure>>,
}

impl CrawlState {
    /// Claim `identity` for crawling; false if it was already claimed
    fn claim(&self, identity: &str) -> bool {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identity.to_string())
    }

    fn record(&self, dependency: Dependency) {
        self.dependencies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(dependency);
    }

    fn fail(&self, failure: CrawlFailure) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failure);
    }

    fn into_report(self, roots: Vec<RootPackage>) -> CrawlReport {
        let mut dependencies = self
            .dependencies
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut failures = self
            .failures
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        dependencies.sort_by(|a, b| a.identity.cmp(&b.identity));
        failures.sort_by(|a, b| a.identity.cmp(&b.identity));
        CrawlReport {
            roots,
            dependencies,
            failures,
        }
    }
}

/// A resolved root together with what its manifest declares
struct OpenedRoot {
    root: RootPackage,
    declared: Vec<DeclaredDependency>,
}

/// Crawls dependency graphs
pub struct DependencyCrawler {
    resolver: PackageResolver,
    registry: ManifestRegistry,
    progress: Box<dyn ProgressReporter>,
}

impl DependencyCrawler {
    pub fn new(resolver: PackageResolver) -> Self {
        Self {
            resolver,
            registry: ManifestRegistry::default(),
            progress: Box::new(SilentProgressReporter),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Crawl several roots into one deduplicated report
    ///
    /// A root that fails to resolve is recorded as a failure. Only when every
    /// root fails is the crawl itself an error.
    pub fn crawl(&self, roots: &[PackageReference]) -> Result<CrawlReport> {
        info!(roots = roots.len(), "crawling dependencies");
        let outcomes: Vec<(&PackageReference, Result<OpenedRoot>)> = roots
            .par_iter()
            .map(|reference| (reference, self.open_root(reference)))
            .collect();

        let state = CrawlState::default();
        let mut opened = Vec::new();
        let mut first_error = None;
        // Claim in input order so a root reached from another root stays a root
        for (reference, outcome) in outcomes {
            match outcome {
                Ok(root) => {
                    if state.claim(&root.root.identity) {
                        opened.push(root);
                    } else {
                        debug!(identity = %root.root.identity, "duplicate root skipped");
                    }
                }
                Err(error) => {
                    warn!(root = %reference, "{error}");
                    state.fail(CrawlFailure {
                        identity: reference.canonical(),
                        required_by: None,
                        error: error.clone(),
                    });
                    first_error.get_or_insert(error);
                }
            }
        }

        if opened.is_empty() {
            if let Some(error) = first_error {
                self.progress.abandon();
                return Err(error);
            }
        }
        Ok(self.crawl_opened(state, opened))
    }

    fn crawl_opened(&self, state: CrawlState, opened: Vec<OpenedRoot>) -> CrawlReport {
        opened.par_iter().for_each(|root| {
            let backend = root
                .root
                .ecosystem
                .and_then(|kind| self.registry.get(kind));
            if let Some(backend) = backend {
                self.crawl_declared(&state, &root.root.identity, backend, &root.declared);
            }
        });
        self.progress.finish();

        let report = state.into_report(opened.into_iter().map(|o| o.root).collect());
        info!(
            dependencies = report.dependencies.len(),
            failures = report.failures.len(),
            "crawl finished"
        );
        report
    }

    fn open_root(&self, reference: &PackageReference) -> Result<OpenedRoot> {
        let package = self.resolver.resolve(reference)?;
        let backend = self.registry.detect(&package.directory);
        let (name, declared) = match backend {
            Some(backend) => read_declared(&package.identity, &package.directory, backend),
            None => (None, Vec::new()),
        };
        let identity = name.unwrap_or_else(|| package.identity.clone());
        debug!(%identity, dir = %package.directory.display(), "opened root");

        Ok(OpenedRoot {
            root: RootPackage {
                config: read_config_logged(&identity, &package.directory),
                ecosystem: backend.map(ManifestBackend::kind),
                identity,
                package,
            },
            declared,
        })
    }

    fn crawl_declared(
        &self,
        state: &CrawlState,
        parent: &str,
        parent_backend: &dyn ManifestBackend,
        declared: &[DeclaredDependency],
    ) {
        declared
            .par_iter()
            .for_each(|dep| self.visit(state, parent, parent_backend, dep));
    }

    fn visit(
        &self,
        state: &CrawlState,
        parent: &str,
        parent_backend: &dyn ManifestBackend,
        declared: &DeclaredDependency,
    ) {
        let identity = declared.identity.as_str();
        if !state.claim(identity) {
            return;
        }
        self.progress.package_visited(identity);

        let failure = |error: TytheError| {
            warn!(dependency = identity, required_by = parent, "{error}");
            state.fail(CrawlFailure {
                identity: identity.to_string(),
                required_by: Some(parent.to_string()),
                error,
            });
        };

        let reference = match &declared.source {
            DependencySource::Reference(reference) => reference,
            DependencySource::Unresolvable(reason) => {
                failure(resolution::failed(identity, reason.clone()));
                return;
            }
        };
        let mut package = match self.resolver.resolve(reference) {
            Ok(package) => package,
            Err(error) => {
                failure(error);
                return;
            }
        };
        if !reference.is_local() {
            package.directory = parent_backend.package_dir(&package.directory, identity);
        }

        let backend = self.registry.detect(&package.directory);
        let children = backend
            .map(|backend| read_declared(identity, &package.directory, backend).1)
            .unwrap_or_default();
        let config = read_config_logged(identity, &package.directory);
        debug!(dependency = identity, tythed = config.is_some(), "crawled");

        state.record(Dependency {
            identity: identity.to_string(),
            package,
            config,
            required_by: parent.to_string(),
            ecosystem: backend.map(ManifestBackend::kind),
        });

        if let Some(backend) = backend {
            self.crawl_declared(state, identity, backend, &children);
        }
    }
}

/// Read a manifest, treating a broken one as declaring nothing
fn read_declared(
    identity: &str,
    dir: &Path,
    backend: &dyn ManifestBackend,
) -> (Option<String>, Vec<DeclaredDependency>) {
    match backend.read(dir) {
        Ok(manifest) => (manifest.name, manifest.dependencies),
        Err(error) => {
            warn!(package = identity, "{error}; treating as having no dependencies");
            (None, Vec::new())
        }
    }
}

/// Read a donation config, treating a broken one as absent
fn read_config_logged(identity: &str, dir: &Path) -> Option<DonationConfig> {
    read_config(dir).unwrap_or_else(|error| {
        warn!(package = identity, "{error}; treating as unconfigured");
        None
    })
}
