//! Git operations for fetching package repositories
//!
//! This module handles:
//! - Cloning repositories (HTTPS, SSH and local `file://` URLs)
//! - Resolving refs (branches, tags, commit prefixes) to exact SHAs
//! - Checking out a resolved commit
//!
//! Authentication lives in [`auth`].

pub mod auth;

use std::borrow::Cow;
use std::path::Path;

use git2::{ErrorClass, FetchOptions, RemoteCallbacks, Repository, build::RepoBuilder};
use tracing::debug;

use crate::error::{Result, git as git_error};

/// Convert SCP-style SSH URLs (`git@host:path`) to `ssh://git@host/path`,
/// which libgit2 parses reliably.
fn normalize_ssh_url(url: &str) -> Cow<'_, str> {
    if !url.starts_with("git@") {
        return Cow::Borrowed(url);
    }
    match url.split_once(':') {
        Some((host, path)) => {
            let path = path.trim_start_matches('/');
            Cow::Owned(format!("ssh://{host}/{path}"))
        }
        None => Cow::Borrowed(url),
    }
}

/// Make `file://relative` and `file://C:\dir` style URLs absolute for libgit2
fn normalize_file_url(url: &str) -> Cow<'_, str> {
    let Some(after) = url.strip_prefix("file://") else {
        return Cow::Borrowed(url);
    };
    if after.contains('\\') {
        return Cow::Owned(format!("file:///{}", after.replace('\\', "/")));
    }
    if !after.is_empty() && !after.starts_with('/') {
        return Cow::Owned(format!("file:///{after}"));
    }
    Cow::Borrowed(url)
}

fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || url.starts_with('/') || Path::new(url).is_absolute()
}

/// Turn a libgit2 error into a short, user-facing reason
fn interpret_git_error(err: &git2::Error) -> String {
    let message = err.message().to_lowercase();

    if message.contains("not found")
        || message.contains("404")
        || message.contains("authentication replays")
        || message.contains("too many redirects")
    {
        "Repository not found".to_string()
    } else if message.contains("authentication") || message.contains("credentials") {
        "Authentication failed".to_string()
    } else if message.contains("permission denied") || message.contains("access denied") {
        "Permission denied".to_string()
    } else if ["connection", "network", "timeout", "timed out", "resolve"]
        .iter()
        .any(|needle| message.contains(needle))
    {
        format!("Network error: {}", err.message())
    } else {
        match err.class() {
            ErrorClass::Http => format!("HTTP error: {}", err.message()),
            ErrorClass::Ssh => format!("SSH error: {}", err.message()),
            _ => err.message().to_string(),
        }
    }
}

/// Clone a git repository into `target`
///
/// A shallow clone (depth 1) only contains the default branch, so callers
/// asking for a specific ref need a full clone. Local repositories are always
/// cloned in full.
pub fn clone(url: &str, target: &Path, shallow: bool) -> Result<Repository> {
    let mut callbacks = RemoteCallbacks::new();
    auth::setup_auth_callbacks(&mut callbacks);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);
    if shallow && !is_local_url(url) {
        fetch_options.depth(1);
    }

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);

    let normalized = normalize_ssh_url(url);
    let normalized = normalize_file_url(&normalized);
    debug!(url, target = %target.display(), shallow, "cloning repository");

    builder
        .clone(normalized.as_ref(), target)
        .map_err(|e| git_error::clone_failed(url, interpret_git_error(&e)))
}

/// Resolve a git ref (branch, tag, or SHA prefix) to a full SHA
///
/// If no ref is provided, resolves HEAD.
pub fn resolve_ref(repo: &Repository, git_ref: Option<&str>) -> Result<String> {
    let commit = match git_ref {
        Some(name) => resolve_reference(repo, name)?,
        None => repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| git_error::ref_resolve_failed("HEAD", e.message()))?,
    };
    Ok(commit.id().to_string())
}

fn resolve_reference<'a>(repo: &'a Repository, name: &str) -> Result<git2::Commit<'a>> {
    let candidates = [
        name.to_string(),
        format!("refs/tags/{name}"),
        format!("refs/remotes/origin/{name}"),
        format!("refs/heads/{name}"),
    ];

    let by_name = candidates.iter().find_map(|candidate| {
        repo.find_reference(candidate)
            .and_then(|reference| reference.peel_to_commit())
            .ok()
    });
    if let Some(commit) = by_name {
        return Ok(commit);
    }

    // Commit SHAs and abbreviations, plus anything else revparse understands
    repo.revparse_single(name)
        .and_then(|object| object.peel_to_commit())
        .map_err(|_| git_error::ref_resolve_failed(name, "Could not resolve reference"))
}

/// Check out `sha` as a detached HEAD with a clean working tree
pub fn checkout_commit(repo: &Repository, sha: &str) -> Result<()> {
    let checkout_err = |e: git2::Error| git_error::checkout_failed(sha, e.message());

    let oid = git2::Oid::from_str(sha).map_err(checkout_err)?;
    let commit = repo.find_commit(oid).map_err(checkout_err)?;
    repo.set_head_detached(commit.id()).map_err(checkout_err)?;

    let mut checkout = git2::build::CheckoutBuilder::new();
    checkout.force();
    repo.checkout_head(Some(&mut checkout)).map_err(checkout_err)
}

/// Clone `url` into `target` and check out `git_ref` (or the default branch)
///
/// Returns the SHA that was checked out.
pub fn clone_at(url: &str, git_ref: Option<&str>, target: &Path) -> Result<String> {
    let repo = clone(url, target, git_ref.is_none())?;
    let sha = resolve_ref(&repo, git_ref)?;
    checkout_commit(&repo, &sha)?;
    Ok(sha)
}
