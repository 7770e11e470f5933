//! Credentials for fetching package repositories
//!
//! Authentication is delegated to git's native credential system: the SSH
//! agent, keys in `~/.ssh/`, and configured credential helpers. Public
//! repositories need none of them.

use std::path::PathBuf;

use git2::{Cred, CredentialType, ErrorClass, ErrorCode, RemoteCallbacks};

/// libgit2 keeps asking for credentials until one works; stop after this many
const MAX_ATTEMPTS: usize = 4;

const SSH_KEY_NAMES: [&str; 3] = ["id_ed25519", "id_ecdsa", "id_rsa"];

fn auth_error(message: &str) -> git2::Error {
    git2::Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

/// Private key files in `~/.ssh/` paired with their public key, if present
fn ssh_key_files() -> Vec<(PathBuf, Option<PathBuf>)> {
    let Some(ssh_dir) = dirs::home_dir().map(|home| home.join(".ssh")) else {
        return Vec::new();
    };
    SSH_KEY_NAMES
        .iter()
        .map(|name| ssh_dir.join(name))
        .filter(|private| private.is_file())
        .map(|private| {
            let public = private.with_extension("pub");
            let public = public.is_file().then_some(public);
            (private, public)
        })
        .collect()
}

fn ssh_credentials(username: &str) -> Result<Cred, git2::Error> {
    if let Ok(cred) = Cred::ssh_key_from_agent(username) {
        return Ok(cred);
    }
    ssh_key_files()
        .into_iter()
        .find_map(|(private, public)| {
            Cred::ssh_key(username, public.as_deref(), &private, None).ok()
        })
        .ok_or_else(|| auth_error("no usable SSH key"))
}

fn helper_credentials(url: &str, username: Option<&str>) -> Result<Cred, git2::Error> {
    let config = git2::Config::open_default().or_else(|_| git2::Config::new())?;
    Cred::credential_helper(&config, url, username)
        // Anonymous access lets the server answer with its real error
        .or_else(|_| Cred::userpass_plaintext(username.unwrap_or(""), ""))
}

/// Install the credentials callback on `callbacks`
pub fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks<'_>) {
    let mut attempts = 0;
    callbacks.credentials(move |url, username_from_url, allowed| {
        attempts += 1;
        if attempts > MAX_ATTEMPTS {
            return Err(auth_error("authentication failed"));
        }

        if allowed.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }
        if allowed.contains(CredentialType::SSH_KEY) {
            return ssh_credentials(username_from_url.unwrap_or("git"));
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return helper_credentials(url, username_from_url);
        }
        Err(auth_error("no supported credential type"))
    });
}
