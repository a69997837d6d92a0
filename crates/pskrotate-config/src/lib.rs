//! Configuration for pskrotate.
//!
//! TOML config (figment-layered with `PSKROTATE_` env vars), the local
//! credential store, and credential resolution (env + keyring + file).
//! Translates into `pskrotate_core::ClientConfig` / `GuestPolicy`.

pub mod credentials;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pskrotate_core::{ClientConfig, GuestPolicy, TlsVerification};

pub use credentials::{CredentialSource, CredentialStore, keys, resolve_secret, store_in_keyring};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardSection,

    #[serde(default)]
    pub messaging: MessagingSection,

    /// Which networks the tagged rotation targets.
    #[serde(default)]
    pub guest: GuestSection,

    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardSection {
    #[serde(default = "default_dashboard_url")]
    pub base_url: String,

    /// Re-sends allowed for a rate-limited (429) request.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            base_url: default_dashboard_url(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessagingSection {
    #[serde(default = "default_messaging_url")]
    pub base_url: String,

    /// First line of every posted report.
    #[serde(default = "default_report_title")]
    pub report_title: String,
}

impl Default for MessagingSection {
    fn default() -> Self {
        Self {
            base_url: default_messaging_url(),
            report_title: default_report_title(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GuestSection {
    #[serde(default = "default_wireless_tag")]
    pub wireless_tag: String,

    #[serde(default = "default_appliance_tag")]
    pub appliance_tag: String,

    #[serde(default = "default_guest_number")]
    pub wireless_number: u8,

    #[serde(default = "default_guest_number")]
    pub appliance_number: u8,
}

impl Default for GuestSection {
    fn default() -> Self {
        Self {
            wireless_tag: default_wireless_tag(),
            appliance_tag: default_appliance_tag(),
            wireless_number: default_guest_number(),
            appliance_number: default_guest_number(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Where report files go. Falls back to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Extra CA bundle (PEM) for TLS-inspecting proxies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            data_dir: None,
            ca_cert: None,
        }
    }
}

fn default_dashboard_url() -> String {
    pskrotate_core::ClientConfig::default().dashboard_url
}
fn default_messaging_url() -> String {
    pskrotate_core::ClientConfig::default().messaging_url
}
fn default_max_retries() -> u32 {
    3
}
fn default_report_title() -> String {
    "PSK Change Report".into()
}
fn default_wireless_tag() -> String {
    GuestPolicy::default().wireless_tag
}
fn default_appliance_tag() -> String {
    GuestPolicy::default().appliance_tag
}
fn default_guest_number() -> u8 {
    2
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

// ── Translation to core types ───────────────────────────────────────

impl Config {
    /// Connection settings for both API clients.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            dashboard_url: self.dashboard.base_url.clone(),
            messaging_url: self.messaging.base_url.clone(),
            tls: self
                .defaults
                .ca_cert
                .clone()
                .map_or(TlsVerification::SystemDefaults, TlsVerification::CustomCa),
            timeout: Duration::from_secs(self.defaults.timeout),
            max_retries: self.dashboard.max_retries,
        }
    }

    pub fn guest_policy(&self) -> GuestPolicy {
        GuestPolicy {
            wireless_tag: self.guest.wireless_tag.clone(),
            appliance_tag: self.guest.appliance_tag.clone(),
            wireless_number: self.guest.wireless_number,
            appliance_number: self.guest.appliance_number,
        }
    }

    /// Report directory: configured `data_dir`, else the platform default.
    pub fn report_dir(&self) -> PathBuf {
        self.defaults.data_dir.clone().unwrap_or_else(data_dir)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "pskrotate", "pskrotate")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the local credential store.
pub fn credentials_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("credentials.toml"),
        |dirs| dirs.config_dir().join("credentials.toml"),
    )
}

/// Default directory for report files.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("data"),
        |dirs| dirs.data_dir().join("reports"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pskrotate");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, layered over defaults and under
/// `PSKROTATE_*` env vars (`PSKROTATE_GUEST__WIRELESS_TAG=...`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PSKROTATE_").split("__"));

    let config: Config = figment.extract()?;
    validate(&config)?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config");
        Config::default()
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.guest.wireless_tag.is_empty() || config.guest.appliance_tag.is_empty() {
        return Err(ConfigError::Validation {
            field: "guest".into(),
            reason: "tags must not be empty".into(),
        });
    }
    if config.defaults.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "defaults.timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
