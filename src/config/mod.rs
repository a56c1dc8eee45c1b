use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file '{path}': {source}")]
  Read {
    path: String,
    source: std::io::Error,
  },

  #[error("failed to parse config file '{path}': {source}")]
  Parse {
    path: String,
    source: toml::de::Error,
  },

  #[error("invalid server_addr '{0}'")]
  InvalidAddr(String),

  #[error("max_request_bytes must be greater than zero")]
  InvalidRequestLimit,
}

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<String>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
  /// Server listening address
  #[serde(default = "default_server_addr")]
  pub server_addr: String,

  /// Largest request line accepted, delimiter excluded
  #[serde(default = "default_max_request_bytes")]
  pub max_request_bytes: usize,

  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,
}

fn default_server_addr() -> String {
  "127.0.0.1:5555".to_string()
}

fn default_max_request_bytes() -> usize {
  1024 * 1024
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server_addr: default_server_addr(),
      max_request_bytes: default_max_request_bytes(),
      log: LogConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: &str) -> Result<Self, ConfigError> {
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_string(),
      source,
    })?;

    let config: Config = toml::from_str(&config_str).map_err(|source| ConfigError::Parse {
      path: path.to_string(),
      source,
    })?;

    config.validate()?;
    Ok(config)
  }

  /// Check values that deserialize fine but cannot be served
  pub fn validate(&self) -> Result<(), ConfigError> {
    self.socket_addr()?;
    if self.max_request_bytes == 0 {
      return Err(ConfigError::InvalidRequestLimit);
    }
    Ok(())
  }

  pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
    self
      .server_addr
      .parse()
      .map_err(|_| ConfigError::InvalidAddr(self.server_addr.clone()))
  }
}
