//! Configuration for the LAN portal front end.
//!
//! TOML config file, `LANPORTAL_*` environment overrides, platform paths,
//! and the file-backed session store that keeps credentials and the
//! restore-after-restart path between runs.

mod store;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lanportal_api::{Client, TransportConfig};

pub use store::FileStore;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] lanportal_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Backend API root.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Where the session is persisted; defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            insecure: false,
            session_file: None,
        }
    }
}

fn default_api_url() -> String {
    "http://localhost/api".into()
}
fn default_timeout() -> u64 {
    30
}

impl Config {
    /// The session file to use: the configured one or the platform default.
    pub fn session_path(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(session_path)
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.timeout),
            accept_invalid_certs: self.insecure,
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "lanportal", "lanportal")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("lanportal");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the persisted session.
pub fn session_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("session.json"),
        |dirs| dirs.data_dir().join("session.json"),
    )
}

/// Directory for log files.
pub fn log_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("logs"),
        |dirs| dirs.data_local_dir().join("logs"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the config from the canonical path and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path` (if present), then `LANPORTAL_*`
/// variables (`LANPORTAL_API_URL`, `LANPORTAL_TIMEOUT`, ...).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LANPORTAL_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, falling back to defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Client construction ─────────────────────────────────────────────

/// Build the backend client for `cfg`, optionally overriding the API URL.
pub fn build_client(cfg: &Config, url_override: Option<&str>) -> Result<Client, ConfigError> {
    let raw = url_override.unwrap_or(&cfg.api_url);
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("unsupported scheme: {}", url.scheme()),
        });
    }

    Ok(Client::new(url, &cfg.transport())?)
}
