//! Go modules (`go.mod`)
//!
//! Only direct requirements count; `// indirect` lines are skipped. A
//! `replace` pointing at a directory makes the module local, and a vendored
//! copy under `vendor/<module>` is preferred to fetching the repository.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, manifest as manifest_error};
use crate::source::{GitSource, PackageReference};

use super::{
    DeclaredDependency, DependencySource, ManifestBackend, ManifestKind, PackageManifest,
    local_reference, read_manifest_file,
};

const GO_MOD: &str = "go.mod";

/// Backend for `go.mod`
#[derive(Debug, Clone, Copy, Default)]
pub struct GoBackend;

#[derive(Debug, Default, PartialEq, Eq)]
struct GoMod {
    module: Option<String>,
    requires: Vec<Require>,
    replaces: Vec<Replace>,
}

#[derive(Debug, PartialEq, Eq)]
struct Require {
    module: String,
    version: String,
    indirect: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct Replace {
    module: String,
    version: Option<String>,
    target: String,
    target_version: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Block {
    Require,
    Replace,
    Ignored,
}

const DIRECTIVES: [&str; 9] = [
    "module",
    "go",
    "toolchain",
    "godebug",
    "require",
    "replace",
    "exclude",
    "retract",
    "tool",
];

fn unquote(token: &str) -> &str {
    token.trim_matches(|c| c == '"' || c == '`')
}

fn parse_go_mod(content: &str) -> std::result::Result<GoMod, String> {
    let mut go_mod = GoMod::default();
    let mut block: Option<Block> = None;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let indirect = raw.contains("// indirect");
        let line = raw.split_once("//").map_or(raw, |(code, _)| code).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(current) = block {
            if line == ")" {
                block = None;
                continue;
            }
            match current {
                Block::Require => go_mod.requires.push(parse_require(line, indirect, line_no)?),
                Block::Replace => go_mod.replaces.push(parse_replace(line, line_no)?),
                Block::Ignored => {}
            }
            continue;
        }

        let (directive, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(d, r)| (d, r.trim()));
        if !DIRECTIVES.contains(&directive) {
            return Err(format!("line {line_no}: unknown directive '{directive}'"));
        }

        if rest == "(" {
            block = Some(match directive {
                "require" => Block::Require,
                "replace" => Block::Replace,
                _ => Block::Ignored,
            });
            continue;
        }

        match directive {
            "module" => {
                if rest.is_empty() {
                    return Err(format!("line {line_no}: module directive without a path"));
                }
                go_mod.module = Some(unquote(rest).to_string());
            }
            "require" => go_mod.requires.push(parse_require(rest, indirect, line_no)?),
            "replace" => go_mod.replaces.push(parse_replace(rest, line_no)?),
            _ => {}
        }
    }

    if block.is_some() {
        return Err("unterminated block".to_string());
    }
    Ok(go_mod)
}

fn parse_require(entry: &str, indirect: bool, line_no: usize) -> std::result::Result<Require, String> {
    match entry.split_whitespace().collect::<Vec<_>>().as_slice() {
        [module, version] => Ok(Require {
            module: unquote(module).to_string(),
            version: unquote(version).to_string(),
            indirect,
        }),
        _ => Err(format!("line {line_no}: expected 'module version' in require")),
    }
}

fn parse_replace(entry: &str, line_no: usize) -> std::result::Result<Replace, String> {
    let Some((old, new)) = entry.split_once("=>") else {
        return Err(format!("line {line_no}: replace without '=>'"));
    };
    let old: Vec<&str> = old.split_whitespace().map(unquote).collect();
    let new: Vec<&str> = new.split_whitespace().map(unquote).collect();

    let (module, version) = match old.as_slice() {
        [module] => (*module, None),
        [module, version] => (*module, Some(*version)),
        _ => return Err(format!("line {line_no}: malformed replace source")),
    };
    let (target, target_version) = match new.as_slice() {
        [target] => (*target, None),
        [target, version] => (*target, Some(*version)),
        _ => return Err(format!("line {line_no}: malformed replace target")),
    };

    Ok(Replace {
        module: module.to_string(),
        version: version.map(str::to_string),
        target: target.to_string(),
        target_version: target_version.map(str::to_string),
    })
}

fn is_local_target(target: &str) -> bool {
    target.starts_with("./")
        || target.starts_with("../")
        || target.starts_with('/')
        || target == "."
        || target == ".."
}

/// Commit hash of a pseudo-version such as `v0.0.0-20210101000000-abcdef123456`
fn pseudo_version_commit(version: &str) -> Option<&str> {
    let (head, commit) = version.rsplit_once('-')?;
    let stamp = head.rsplit(['-', '.']).next()?;
    let is_commit = commit.len() == 12 && commit.chars().all(|c| c.is_ascii_hexdigit());
    let is_stamp = stamp.len() == 14 && stamp.chars().all(|c| c.is_ascii_digit());
    (is_commit && is_stamp).then_some(commit)
}

/// Git ref holding the given module version
pub fn version_to_ref(version: &str) -> String {
    let version = version.trim_end_matches("+incompatible");
    pseudo_version_commit(version)
        .unwrap_or(version)
        .to_string()
}

fn remote_module(module: &str, version: &str) -> DependencySource {
    let source = GitSource::from_module_path(module).with_ref(version_to_ref(version));
    DependencySource::Reference(PackageReference::Remote(source))
}

impl GoBackend {
    fn source_for(dir: &Path, require: &Require, replace: Option<&Replace>) -> DependencySource {
        if let Some(replace) = replace {
            if is_local_target(&replace.target) {
                return local_reference(dir, &replace.target);
            }
            let version = replace.target_version.as_deref().unwrap_or(&require.version);
            return remote_module(&replace.target, version);
        }

        let vendored = dir.join("vendor").join(&require.module);
        if vendored.is_dir() {
            return DependencySource::Reference(PackageReference::local(vendored));
        }
        remote_module(&require.module, &require.version)
    }
}

impl ManifestBackend for GoBackend {
    fn kind(&self) -> ManifestKind {
        ManifestKind::Go
    }

    fn marker(&self) -> &'static str {
        GO_MOD
    }

    fn read(&self, dir: &Path) -> Result<PackageManifest> {
        let (path, content) = read_manifest_file(dir, GO_MOD)?;
        let go_mod = parse_go_mod(&content)
            .map_err(|reason| manifest_error::parse_failed(path.display().to_string(), reason))?;

        let replaces: HashMap<&str, &Replace> = go_mod
            .replaces
            .iter()
            .map(|r| (r.module.as_str(), r))
            .collect();

        let declared = go_mod
            .requires
            .iter()
            .filter(|require| !require.indirect)
            .map(|require| {
                // A versioned replace only applies to that version
                let replace = replaces.get(require.module.as_str()).copied().filter(|r| {
                    r.version.as_deref().is_none_or(|v| v == require.version)
                });
                DeclaredDependency::new(
                    require.module.clone(),
                    Self::source_for(dir, require, replace),
                )
            })
            .collect();

        Ok(PackageManifest::new(go_mod.module, declared))
    }
}
