use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::roster;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WatchlistConfig {
    #[serde(default = "default_subject_ids")]
    pub default_ids: Vec<i64>,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_base_url() -> String {
    "https://cdn.jsdelivr.net/gh/akabab/superhero-api@0.3.0/api".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_subject_ids() -> Vec<i64> {
    roster::DEFAULT_SUBJECT_IDS.to_vec()
}
fn default_debounce_ms() -> u64 {
    300
}
fn default_bind() -> String {
    "127.0.0.1:7368".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            default_ids: default_subject_ids(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            watchlist: WatchlistConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Built-in configuration used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate api
    if config.api.base_url.trim().is_empty() {
        anyhow::bail!("api.base_url must not be empty");
    }
    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs must be > 0");
    }

    // Validate watchlist
    if config.watchlist.default_ids.is_empty() {
        anyhow::bail!("watchlist.default_ids must not be empty");
    }

    // Validate server
    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}

/// Load the config file at `path`, or fall back to [`Config::minimal`]
/// when the file does not exist. The tool is fully usable with zero
/// configuration; a present-but-broken file is still an error.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::minimal())
    }
}
