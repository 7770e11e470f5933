//! Package reference handling
//!
//! This module handles parsing package references from the formats accepted on
//! the command line and in dependency manifests:
//! - Local directory paths: `./my-package`, `../shared`, `/abs/path`, `file:///abs/path`
//! - Git repositories: `https://github.com/user/repo.git`, `git@github.com:user/repo.git`
//! - GitHub short-form: `github:author/repo`, `author/repo`
//! - Host-qualified module paths: `github.com/author/repo`
//! - With ref: `github:user/repo#v1.0.0`
//!
//! ## Module Organization
//!
//! - `package_ref.rs`: `PackageReference` enum and parsing
//! - `git_source.rs`: `GitSource` struct, URL parsing and canonical identity

pub mod git_source;
pub mod package_ref;

pub use git_source::GitSource;
pub use package_ref::PackageReference;
