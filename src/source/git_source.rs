//! Git source handling
//!
//! This module provides the `GitSource` struct, URL parsing for git remotes and
//! the mapping from host-qualified module paths (as used by Go) to repositories.

use serde::{Deserialize, Serialize};

use crate::error::{Result, resolution};

/// Hosts where a module path is `<host>/<owner>/<repo>[/<subdir>]`
const THREE_SEGMENT_HOSTS: [&str; 3] = ["github.com", "gitlab.com", "bitbucket.org"];

/// Git repository source details
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitSource {
    /// Repository URL (HTTPS, SSH or file)
    pub url: String,

    /// Path of the package within the repository
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Git ref (branch, tag, or SHA)
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

impl GitSource {
    /// Create a new git source
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            path: None,
            git_ref: None,
        }
    }

    /// Set git ref
    pub fn with_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = Some(git_ref.into());
        self
    }

    /// Set path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim_matches('/');
        self.path = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Parse a git source from a string
    ///
    /// An optional `#ref` fragment selects the branch, tag or commit.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (main_part, ref_part) = match input.split_once('#') {
            Some((main, frag)) => (main, Some(frag).filter(|f| !f.is_empty())),
            None => (input, None),
        };

        if main_part.is_empty() {
            return Err(resolution::invalid_reference(input, "empty repository URL"));
        }

        let mut source = Self::parse_url(main_part)?;
        if let Some(git_ref) = ref_part {
            source.git_ref = Some(git_ref.to_string());
        }
        Ok(source)
    }

    /// Parse URL portion (without fragment)
    fn parse_url(input: &str) -> Result<Self> {
        let input = input.strip_prefix("git+").unwrap_or(input);

        if let Some(rest) = input.strip_prefix("github:") {
            if is_github_shorthand(rest) {
                return Ok(Self::new(format!("https://github.com/{rest}.git")));
            }
            return Err(resolution::invalid_reference(
                input,
                "expected github:owner/repo",
            ));
        }

        if input.starts_with("https://")
            || input.starts_with("http://")
            || input.starts_with("git@")
            || input.starts_with("ssh://")
            || input.starts_with("git://")
            || input.starts_with("file://")
        {
            return Ok(Self::new(input));
        }

        if is_github_shorthand(input) {
            return Ok(Self::new(format!("https://github.com/{input}.git")));
        }

        if looks_like_module_path(input) {
            return Ok(Self::from_module_path(input));
        }

        Err(resolution::invalid_reference(input, "Unknown source format"))
    }

    /// Map a host-qualified module path to the repository that hosts it
    ///
    /// `github.com/owner/repo/sub/pkg` becomes `https://github.com/owner/repo.git`
    /// with path `sub/pkg`. A trailing major-version segment (`/v2`) is not a
    /// directory and is dropped. `golang.org/x/<name>` lives on go.googlesource.com.
    pub fn from_module_path(module: &str) -> Self {
        let module = module.trim_matches('/');
        let segments: Vec<&str> = module.split('/').filter(|s| !s.is_empty()).collect();

        let (repo_url, rest): (String, &[&str]) = match segments.as_slice() {
            ["golang.org", "x", name, rest @ ..] => {
                (format!("https://go.googlesource.com/{name}"), rest)
            }
            [host, owner, repo, rest @ ..] if THREE_SEGMENT_HOSTS.contains(host) => {
                (format!("https://{host}/{owner}/{repo}.git"), rest)
            }
            _ => (format!("https://{module}"), &[]),
        };

        let mut subdir: Vec<&str> = rest.to_vec();
        if subdir.last().is_some_and(|last| is_major_version_suffix(last)) {
            subdir.pop();
        }

        Self::new(repo_url).with_path(subdir.join("/"))
    }

    /// Canonical identity of this source, independent of how it was written
    ///
    /// `https://github.com/Owner/repo.git`, `git@github.com:Owner/repo.git` and
    /// `ssh://git@github.com/Owner/repo` all map to `github.com/Owner/repo`.
    pub fn canonical(&self) -> String {
        let base = canonical_url(&self.url);
        match &self.path {
            Some(path) => format!("{base}/{path}"),
            None => base,
        }
    }
}

/// Strip scheme, user info and `.git` suffix from a repository URL
pub fn canonical_url(url: &str) -> String {
    let url = url.trim().strip_prefix("git+").unwrap_or(url.trim());

    if let Some(path) = url.strip_prefix("file://") {
        return path.trim_end_matches('/').to_string();
    }

    let without_scheme = ["https://", "http://", "ssh://", "git://"]
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
        .unwrap_or(url);

    let without_user = match without_scheme.split_once('@') {
        Some((user, rest)) if !user.contains('/') => rest,
        _ => without_scheme,
    };

    // SCP-style `host:owner/repo`
    let normalized = match without_user.split_once(':') {
        Some((host, path)) if !host.contains('/') && !path.starts_with("//") => {
            let path = path.trim_start_matches('/');
            // `host:22/path` is a port, not a path separator
            let path = match path.split_once('/') {
                Some((port, rest)) if port.chars().all(|c| c.is_ascii_digit()) => rest,
                _ => path,
            };
            format!("{host}/{path}")
        }
        _ => without_user.to_string(),
    };

    let trimmed = normalized.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    match trimmed.split_once('/') {
        Some((host, path)) => format!("{}/{}", host.to_lowercase(), path),
        None => trimmed.to_lowercase(),
    }
}

/// Check if string looks like a GitHub `owner/repo` shorthand
fn is_github_shorthand(input: &str) -> bool {
    let Some((owner, repo)) = input.split_once('/') else {
        return false;
    };
    let valid = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    valid(owner) && valid(repo) && !owner.contains('.') && !repo.contains('/')
}

/// Check if string looks like `host.tld/owner/...`
fn looks_like_module_path(input: &str) -> bool {
    match input.split_once('/') {
        Some((host, rest)) => host.contains('.') && !host.starts_with('.') && !rest.is_empty(),
        None => false,
    }
}

fn is_major_version_suffix(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) && n != "0" && n != "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_shorthand() {
        let source = GitSource::parse("author/repo").unwrap();
        assert_eq!(source.url, "https://github.com/author/repo.git");
        assert_eq!(source.git_ref, None);
    }

    #[test]
    fn test_parse_github_prefix_with_ref() {
        let source = GitSource::parse("github:author/repo#v1.0.0").unwrap();
        assert_eq!(source.url, "https://github.com/author/repo.git");
        assert_eq!(source.git_ref, Some("v1.0.0".to_string()));
    }

    #[test]
    fn test_parse_https_and_ssh() {
        let https = GitSource::parse("https://gitlab.com/group/project.git").unwrap();
        assert_eq!(https.url, "https://gitlab.com/group/project.git");

        let ssh = GitSource::parse("git@github.com:author/repo.git#main").unwrap();
        assert_eq!(ssh.url, "git@github.com:author/repo.git");
        assert_eq!(ssh.git_ref, Some("main".to_string()));
    }

    #[test]
    fn test_parse_git_plus_prefix() {
        let source = GitSource::parse("git+https://github.com/a/b.git").unwrap();
        assert_eq!(source.url, "https://github.com/a/b.git");
    }

    #[test]
    fn test_parse_module_path() {
        let source = GitSource::parse("github.com/tythe-protocol/z_test1").unwrap();
        assert_eq!(source.url, "https://github.com/tythe-protocol/z_test1.git");
        assert_eq!(source.path, None);
    }

    #[test]
    fn test_parse_unknown_format() {
        assert!(GitSource::parse("not a url").is_err());
        assert!(GitSource::parse("#main").is_err());
        assert!(GitSource::parse("github:only-owner").is_err());
    }

    #[test]
    fn test_from_module_path_with_subdir() {
        let source = GitSource::from_module_path("github.com/owner/repo/sub/pkg");
        assert_eq!(source.url, "https://github.com/owner/repo.git");
        assert_eq!(source.path, Some("sub/pkg".to_string()));
        assert_eq!(source.canonical(), "github.com/owner/repo/sub/pkg");
    }

    #[test]
    fn test_from_module_path_major_version() {
        let source = GitSource::from_module_path("github.com/owner/repo/v3");
        assert_eq!(source.url, "https://github.com/owner/repo.git");
        assert_eq!(source.path, None);
    }

    #[test]
    fn test_from_module_path_golang_x() {
        let source = GitSource::from_module_path("golang.org/x/net/context");
        assert_eq!(source.url, "https://go.googlesource.com/net");
        assert_eq!(source.path, Some("context".to_string()));
    }

    #[test]
    fn test_from_module_path_other_host() {
        let source = GitSource::from_module_path("gopkg.in/yaml.v2");
        assert_eq!(source.url, "https://gopkg.in/yaml.v2");
        assert_eq!(source.path, None);
    }

    #[test]
    fn test_canonical_is_independent_of_spelling() {
        let expected = "github.com/Owner/repo";
        for url in [
            "https://github.com/Owner/repo.git",
            "https://GitHub.com/Owner/repo/",
            "git@github.com:Owner/repo.git",
            "ssh://git@github.com/Owner/repo",
            "ssh://git@github.com:22/Owner/repo.git",
        ] {
            assert_eq!(canonical_url(url), expected, "for {url}");
        }
    }

    #[test]
    fn test_canonical_file_url() {
        assert_eq!(canonical_url("file:///tmp/repo"), "/tmp/repo");
    }

    #[test]
    fn test_with_path_trims_slashes() {
        let source = GitSource::new("https://example.com/r.git").with_path("/a/b/");
        assert_eq!(source.path, Some("a/b".to_string()));
        let source = GitSource::new("https://example.com/r.git").with_path("");
        assert_eq!(source.path, None);
    }
}
