//! Credential storage and resolution.
//!
//! Secrets resolve in order: environment variable of the same name, the
//! system keyring (service `pskrotate`), then the local credential file.
//! Non-secret identifiers (room id, user id) live in the file only.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::debug;

use crate::ConfigError;

/// Names used in the environment, keyring, and credential file.
pub mod keys {
    pub const MERAKI_API_KEY: &str = "MERAKI_API_KEY";
    pub const WEBEX_BOT_TOKEN: &str = "WEBEX_BOT_TOKEN";
    pub const WEBEX_PAT: &str = "WEBEX_PAT";
    pub const WEBEX_ROOM_ID: &str = "WEBEX_ROOM_ID";
    pub const WEBEX_USER_ID: &str = "WEBEX_USER_ID";

    /// Every name `config set-credential` accepts.
    pub const ALL: [&str; 5] = [
        MERAKI_API_KEY,
        WEBEX_BOT_TOKEN,
        WEBEX_PAT,
        WEBEX_ROOM_ID,
        WEBEX_USER_ID,
    ];

    /// Values that are secrets (and may go into the keyring).
    pub fn is_secret(name: &str) -> bool {
        matches!(name, MERAKI_API_KEY | WEBEX_BOT_TOKEN | WEBEX_PAT)
    }
}

const KEYRING_SERVICE: &str = "pskrotate";

// ── Credential store ────────────────────────────────────────────────

/// Flat `NAME = "value"` TOML file.
///
/// `set` and `remove` rewrite the file (temp file + rename) before the
/// in-memory map changes, so a failed write leaves both untouched.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl CredentialStore {
    /// Open the store at its default location.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(crate::credentials_path())
    }

    /// Open (or start empty if the file does not exist).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let mut next = self.values.clone();
        next.insert(name.to_owned(), value.to_owned());
        self.persist(&next)?;
        self.values = next;
        debug!(name, path = %self.path.display(), "stored credential");
        Ok(())
    }

    /// Returns `true` if the name was present.
    pub fn remove(&mut self, name: &str) -> Result<bool, ConfigError> {
        if !self.values.contains_key(name) {
            return Ok(false);
        }
        let mut next = self.values.clone();
        next.remove(name);
        self.persist(&next)?;
        self.values = next;
        Ok(true)
    }

    /// Stored names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = toml::to_string_pretty(values)?;
        let tmp = self.path.with_extension("toml.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            restrict_permissions(&file)?;
            file.write_all(body.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Env,
    Keyring,
    File,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Env => "environment",
            Self::Keyring => "keyring",
            Self::File => "credential file",
        })
    }
}

/// Resolve `name` from env → keyring → store.
pub fn resolve_secret(
    name: &str,
    store: &CredentialStore,
) -> Option<(SecretString, CredentialSource)> {
    let env = std::env::var(name).ok();
    let keyring = if keys::is_secret(name) {
        keyring_get(name)
    } else {
        None
    };
    resolve_from(env, keyring, store.get(name))
}

fn resolve_from(
    env: Option<String>,
    keyring: Option<String>,
    file: Option<&str>,
) -> Option<(SecretString, CredentialSource)> {
    let non_empty = |v: &String| !v.trim().is_empty();

    if let Some(v) = env.filter(non_empty) {
        return Some((SecretString::from(v), CredentialSource::Env));
    }
    if let Some(v) = keyring.filter(non_empty) {
        return Some((SecretString::from(v), CredentialSource::Keyring));
    }
    file.map(|v| (SecretString::from(v.to_owned()), CredentialSource::File))
}

fn keyring_get(name: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, name)
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Store a secret in the system keyring.
pub fn store_in_keyring(name: &str, value: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, name)?.set_password(value)?;
    Ok(())
}
