//! Gateway configuration
//!
//! Loaded from the JSON file named by `CONFIG_FILENAME`. Absent, zero or
//! empty fields fall back to the defaults below.

use std::env;
use std::fs;

use serde::Deserialize;
use tracing::info;

use crate::error::AppError;

/// Environment variable naming the JSON configuration file
pub const ENV_CONFIG_FILENAME: &str = "CONFIG_FILENAME";

pub const DEFAULT_IRC_SERVER: &str = "irc.freenode.net";
pub const DEFAULT_IRC_PORT: u16 = 6667;
pub const DEFAULT_CHANNEL: &str = "#midnightcafe";
pub const DEFAULT_WEB_PORT: u16 = 8080;

/// Connection parameters and the single tracked channel
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IrcConfig {
    pub server: String,
    pub port: u16,
    pub channel: String,
    #[serde(rename = "web-server-port-number")]
    pub web_port: u16,
}

impl Default for IrcConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_IRC_SERVER.to_string(),
            port: DEFAULT_IRC_PORT,
            channel: DEFAULT_CHANNEL.to_string(),
            web_port: DEFAULT_WEB_PORT,
        }
    }
}

impl IrcConfig {
    /// Load from `CONFIG_FILENAME`, or use the defaults when it is unset
    pub fn from_env() -> Result<Self, AppError> {
        match env::var(ENV_CONFIG_FILENAME) {
            Ok(path) if !path.is_empty() => Self::load(&path),
            _ => {
                info!("{} not set, using default configuration", ENV_CONFIG_FILENAME);
                Ok(Self::default())
            }
        }
    }

    /// Read and parse a JSON configuration file
    pub fn load(path: &str) -> Result<Self, AppError> {
        let data = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_json(&data)?;
        info!("Config: {:?}", config);
        Ok(config)
    }

    /// Parse JSON text, applying defaults to zero-valued fields
    pub fn from_json(data: &str) -> Result<Self, AppError> {
        let config: IrcConfig = serde_json::from_str(data)?;
        Ok(config.with_defaults())
    }

    fn with_defaults(mut self) -> Self {
        if self.server.is_empty() {
            self.server = DEFAULT_IRC_SERVER.to_string();
        }
        if self.port == 0 {
            self.port = DEFAULT_IRC_PORT;
        }
        if self.channel.is_empty() {
            self.channel = DEFAULT_CHANNEL.to_string();
        }
        if self.web_port == 0 {
            self.web_port = DEFAULT_WEB_PORT;
        }
        self
    }

    /// `server:port` address of the IRC server
    pub fn address(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }
}
