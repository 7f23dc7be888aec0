use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TodoManagerError};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4567;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port; 0 lets the OS pick one
    pub port: u16,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read a YAML config file. Keys left out take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            TodoManagerError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Defaults, then the optional file, then explicit overrides.
    pub fn load(
        path: Option<&Path>,
        host: Option<String>,
        port: Option<u16>,
        log_filter: Option<String>,
    ) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(host) = host {
            config.host = host;
        }
        if let Some(port) = port {
            config.port = port;
        }
        if let Some(filter) = log_filter {
            config.log_filter = filter;
        }
        Ok(config)
    }

    /// `host:port` as handed to the listener
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
