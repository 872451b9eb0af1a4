#![deny(unsafe_code)]

//! Configuration loading and validation for grepd.
//!
//! Loads TOML configuration files and validates them against expected
//! schemas. Provides the [`AppConfig`] type as the central configuration
//! structure shared by the server and the CLI.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Text library configuration.
    #[serde(default)]
    pub library: LibraryConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration for the HTTP server and its shutdown behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the server listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Port the server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Seconds between a termination signal and actual process exit.
    /// While this grace period elapses, new requests are refused with 503.
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,

    /// Seconds the `/wait` demo endpoint blocks before responding.
    #[serde(default = "default_wait_delay_secs")]
    pub wait_delay_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            listen_port: default_listen_port(),
            grace_period_secs: default_grace_period_secs(),
            wait_delay_secs: default_wait_delay_secs(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_listen_port() -> u16 {
    9090
}

fn default_grace_period_secs() -> u64 {
    15
}

fn default_wait_delay_secs() -> u64 {
    10
}

/// Configuration for the searchable text library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory containing the plain-text source files.
    #[serde(default = "default_library_root")]
    pub root: String,

    /// Source file used when a request names no dictionary.
    /// Must be a bare filename, not a path.
    #[serde(default = "default_source")]
    pub default_source: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: default_library_root(),
            default_source: default_source(),
        }
    }
}

fn default_library_root() -> String {
    "library".to_string()
}

fn default_source() -> String {
    "quote_file.txt".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen_port == 0 {
            return Err(ConfigError::Validation(
                "server.listen_port must be non-zero".to_string(),
            ));
        }
        if self.server.listen_addr.is_empty() {
            return Err(ConfigError::Validation(
                "server.listen_addr must not be empty".to_string(),
            ));
        }
        if self.library.root.is_empty() {
            return Err(ConfigError::Validation(
                "library.root must not be empty".to_string(),
            ));
        }
        let source = &self.library.default_source;
        if source.is_empty() {
            return Err(ConfigError::Validation(
                "library.default_source must not be empty".to_string(),
            ));
        }
        if source.contains('/') || source.contains('\\') || source.contains("..") {
            return Err(ConfigError::Validation(
                "library.default_source must be a bare filename".to_string(),
            ));
        }
        Ok(())
    }
}
