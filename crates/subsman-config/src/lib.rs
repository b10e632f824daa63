//! Shared configuration for the SubsManager CLI and TUI.
//!
//! One TOML file plus `SUBSMAN_*` environment overrides, translated to
//! `subsman_core::ClientConfig`. Both binaries depend on this crate; the CLI
//! layers its global flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use subsman_core::{ClientConfig, DEFAULT_BACKEND_URL};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Where the backend lives.
    #[serde(default)]
    pub backend: Backend,

    /// Defaults for CLI output and node filtering.
    #[serde(default)]
    pub defaults: Defaults,

    /// Terminal dashboard settings.
    #[serde(default)]
    pub tui: TuiSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Backend {
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Default `nodes filter` delay ceiling, in ms.
    #[serde(default = "default_max_delay")]
    pub max_delay: u32,

    /// Default `nodes filter` speed floor, in MB/s.
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,

    /// Log page size.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            max_delay: default_max_delay(),
            min_speed: default_min_speed(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TuiSettings {
    /// Seconds between status refreshes. 0 disables them.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

impl Default for TuiSettings {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_BACKEND_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_output() -> String {
    "table".into()
}
fn default_max_delay() -> u32 {
    400
}
fn default_min_speed() -> f64 {
    1.0
}
fn default_page_size() -> u32 {
    20
}
fn default_refresh_interval() -> u64 {
    10
}

impl Config {
    /// Build the runtime client config from the `[backend]` section.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut client = ClientConfig::from_url(&self.backend.url).map_err(|e| {
            ConfigError::Validation {
                field: "backend.url".into(),
                reason: e.to_string(),
            }
        })?;
        if self.backend.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "backend.timeout".into(),
                reason: "must be at least one second".into(),
            });
        }
        client.timeout = Duration::from_secs(self.backend.timeout);
        Ok(client)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "subsman", "subsman").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("subsman");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file path + environment.
///
/// Environment keys use a double underscore between section and field,
/// e.g. `SUBSMAN_BACKEND__URL` or `SUBSMAN_DEFAULTS__MAX_DELAY`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SUBSMAN_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
