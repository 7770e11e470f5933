//! Common test utilities for tythe integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const USDC_ADDRESS: &str = "0x52908400098527886e0f7030069857d2e4169ee7";
/// [`USDC_ADDRESS`] in its mixed-case checksum spelling
pub const USDC_CHECKSUM_ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
pub const PAYPAL_ACCOUNT: &str = "maintainer@example.com";

/// A scratch directory holding test packages and the package cache
pub struct TestWorkspace {
    pub temp: TempDir,
    pub path: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Cache directory handed to every command run in this workspace
    pub fn cache_dir(&self) -> PathBuf {
        self.path.join("cache")
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Create an npm package whose dependencies are sibling directories
    pub fn create_npm_package(&self, name: &str, deps: &[&str]) -> PathBuf {
        let dependencies = deps
            .iter()
            .map(|dep| format!("\"{dep}\": \"file:../{dep}\""))
            .collect::<Vec<_>>()
            .join(", ");
        self.write_file(
            &format!("{name}/package.json"),
            &format!("{{\"name\": \"{name}\", \"dependencies\": {{{dependencies}}}}}"),
        );
        self.path.join(name)
    }

    /// Give a package a tythe.json
    pub fn write_tythe_json(&self, name: &str, content: &str) {
        self.write_file(&format!("{name}/tythe.json"), content);
    }

    pub fn accept_usdc(&self, name: &str) {
        self.write_tythe_json(name, &format!("{{\"usdcAddress\": \"{USDC_ADDRESS}\"}}"));
    }

    pub fn accept_paypal(&self, name: &str) {
        self.write_tythe_json(name, &format!("{{\"paypalAccount\": \"{PAYPAL_ACCOUNT}\"}}"));
    }

    /// Write a payment script that prints a transaction id, or fails when
    /// `fail` is set. Returns the command line to pass as a backend.
    pub fn payment_script(&self, name: &str, fail: bool) -> String {
        let body = if fail {
            "#!/bin/sh\necho \"insufficient funds\" >&2\nexit 3\n".to_string()
        } else {
            format!(
                "#!/bin/sh\necho \"$1 $2 $TYTHE_SANDBOX\" >> \"{}\"\necho \"tx-$1\"\n",
                self.path.join(format!("{name}.log")).display()
            )
        };
        self.write_file(&format!("{name}.sh"), &body);
        format!("sh {}", self.path.join(format!("{name}.sh")).display())
    }

    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// The real tythe binary, isolated from the caller's environment
#[allow(deprecated)]
pub fn tythe_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tythe").expect("tythe binary");
    cmd.env_remove("TYTHE_USDC_COMMAND")
        .env_remove("TYTHE_PAYPAL_COMMAND")
        .env_remove("TYTHE_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// tythe bound to a workspace's cache directory
pub fn tythe_cmd_for_workspace(workspace: &TestWorkspace) -> Command {
    let mut cmd = tythe_cmd();
    cmd.env("TYTHE_CACHE_DIR", workspace.cache_dir())
        .current_dir(&workspace.path);
    cmd
}

pub fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Commit everything in `dir` as a fresh git repository and tag it
pub fn commit_and_tag(dir: &Path, tag: &str) -> String {
    use git2::{IndexAddOption, Repository, Signature};

    let repo = Repository::init(dir).expect("git init");
    let mut index = repo.index().expect("index");
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .expect("add files");
    index.write().expect("write index");
    let tree = repo
        .find_tree(index.write_tree().expect("write tree"))
        .expect("find tree");
    let sig = Signature::now("Test", "test@example.com").expect("signature");
    let commit = repo
        .commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .expect("commit");
    let object = repo.find_object(commit, None).expect("commit object");
    repo.tag_lightweight(tag, &object, false).expect("tag");
    commit.to_string()
}
