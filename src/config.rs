use crate::constants::{
    BUFFER_SIZE, CHUNK_INTERVAL_MS, DEFAULT_HOST, DEFAULT_PORT, PASSWORD_RETRY_INTERVAL_MS,
};
use crate::core_transfer::TransferOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory every new session starts in (process working directory if unset)
    pub root_dir: Option<PathBuf>,
    /// Shared secret; prompted for at startup when absent
    pub password: Option<String>,
    pub buffer_size: usize,
    pub chunk_interval_ms: u64,
    /// Drop a session idle for this long (no limit if unset)
    pub idle_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            root_dir: None,
            password: None,
            buffer_size: BUFFER_SIZE,
            chunk_interval_ms: CHUNK_INTERVAL_MS,
            idle_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            buffer_size: self.buffer_size.max(1),
            chunk_interval: Duration::from_millis(self.chunk_interval_ms),
            // A stalled transfer counts as idle.
            io_timeout: self.idle_timeout(),
        }
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }

    pub fn root_dir(&self) -> Result<PathBuf> {
        let dir = match &self.root_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to read the working directory")?,
        };
        dir.canonicalize()
            .with_context(|| format!("Invalid root directory: {}", dir.display()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub buffer_size: usize,
    pub chunk_interval_ms: u64,
    pub retry_interval_ms: u64,
    /// Give up on a server silent for this long (wait forever if unset)
    pub io_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            buffer_size: BUFFER_SIZE,
            chunk_interval_ms: CHUNK_INTERVAL_MS,
            retry_interval_ms: PASSWORD_RETRY_INTERVAL_MS,
            io_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            buffer_size: self.buffer_size.max(1),
            chunk_interval: Duration::from_millis(self.chunk_interval_ms),
            io_timeout: self.io_timeout(),
        }
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Reads `path` when given, built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}
