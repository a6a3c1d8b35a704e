use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use library::{SourceToggle, DEFAULT_LOCAL_URL_TEMPLATE};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub version: u32,
    pub port: u16,
    /// Song document on disk, used when `source_url` is empty.
    pub source_path: String,
    pub source_url: String,
    pub source_timeout_secs: u64,
    /// Play from the shared links in the document instead of the local share.
    pub source_remote: bool,
    pub local_url_template: String,
    pub eager_init: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            port: 3000,
            source_path: "songs.json".to_string(),
            source_url: String::new(),
            source_timeout_secs: 10,
            source_remote: false,
            local_url_template: DEFAULT_LOCAL_URL_TEMPLATE.to_string(),
            eager_init: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn config_path_from_env() -> PathBuf {
    match env::var("RAGA_CONFIG") {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => default_config_path(),
    }
}

fn default_config_path() -> PathBuf {
    match env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(|dir| dir.join("config.yaml"))
            .unwrap_or_else(|| PathBuf::from("config.yaml")),
        Err(_) => PathBuf::from("config.yaml"),
    }
}

pub fn load_or_create_config(path: &Path) -> Result<(ServerConfig, bool), ConfigError> {
    if path.exists() {
        let contents = fs::read_to_string(path)?;
        let mut config: ServerConfig = serde_yaml::from_str(&contents)?;
        if config.version < CONFIG_VERSION {
            config.version = CONFIG_VERSION;
        }
        if config.port == 0 {
            config.port = 3000;
        }
        if config.source_path.trim().is_empty() {
            config.source_path = "songs.json".to_string();
        }
        if config.local_url_template.trim().is_empty() {
            config.local_url_template = DEFAULT_LOCAL_URL_TEMPLATE.to_string();
        }
        if config.source_timeout_secs == 0 {
            config.source_timeout_secs = 10;
        }
        return Ok((config, false));
    }

    let config = ServerConfig::default();
    save_config(path, &config)?;
    Ok((config, true))
}

pub fn save_config(path: &Path, config: &ServerConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    fs::write(path, contents)?;
    Ok(())
}

pub fn resolve_path(config_path: &Path, value: &str) -> PathBuf {
    let raw = PathBuf::from(value);
    if raw.is_absolute() {
        return raw;
    }
    let base = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    base.join(raw)
}

/// The remote/local switch as stored in the live config.
pub struct ConfigToggle {
    config: Arc<RwLock<ServerConfig>>,
}

impl ConfigToggle {
    pub fn new(config: Arc<RwLock<ServerConfig>>) -> Self {
        Self { config }
    }
}

impl SourceToggle for ConfigToggle {
    fn is_remote(&self) -> bool {
        self.config.read().source_remote
    }
}
