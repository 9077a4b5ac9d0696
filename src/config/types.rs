//! Core configuration types and loading.

use super::logging::LoggingConfig;
use crate::model::DEFAULT_PLAYLIST;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Get a static error code string for log labelling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "config_io",
            Self::Parse(_) => "config_parse",
        }
    }
}

/// Client configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Identity and defaults of the client.
    pub client: ClientConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

/// Client identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Id of the user the client is authenticated as.
    pub user_id: String,
    /// Room to treat as current on startup.
    #[serde(default)]
    pub room_id: Option<String>,
    /// Playlist used by queue operations that don't name one.
    #[serde(default = "default_playlist")]
    pub default_playlist: String,
}

impl ClientConfig {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            room_id: None,
            default_playlist: default_playlist(),
        }
    }

    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }
}

fn default_playlist() -> String {
    DEFAULT_PLAYLIST.to_string()
}
