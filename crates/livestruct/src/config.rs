// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Server configuration.
//!
//! Loaded from a TOML file or built from defaults; command-line flags
//! override individual values.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Export server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interval between updater batches (milliseconds).
    #[serde(default = "default_update_interval")]
    pub update_interval_ms: u64,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_update_interval() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            update_interval_ms: default_update_interval(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.trim().is_empty() {
            return Err(ConfigError::Invalid("Bind address is empty".into()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("Port must be non-zero".into()));
        }
        if self.update_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "Update interval must be non-zero".into(),
            ));
        }
        self.socket_addr()?;
        Ok(())
    }

    /// Listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("Bad bind address '{}': {}", self.bind, e)))
    }

    /// Interval between updater batches.
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.update_interval(), Duration::from_secs(1));
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "port = 9090\nupdate_interval_ms = 250").expect("write");

        let config = ServerConfig::from_file(file.path()).expect("load");
        assert_eq!(config.port, 9090);
        assert_eq!(config.update_interval_ms, 250);
        // Unset keys fall back to defaults.
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "update_interval_ms = 0").expect("write");

        let err = ServerConfig::from_file(file.path()).expect_err("zero interval");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_file_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "port = \"eighty\"").expect("write");

        let err = ServerConfig::from_file(file.path()).expect_err("bad type");
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ServerConfig::from_file("/nonexistent/livestruct.toml").expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validate() {
        let mut config = ServerConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.bind = "not an address".into();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.bind = "127.0.0.1".into();
        assert_eq!(
            config.socket_addr().expect("addr"),
            "127.0.0.1:8080".parse::<SocketAddr>().expect("literal")
        );
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ServerConfig {
            port: 3000,
            ..Default::default()
        };
        let text = config.to_toml().expect("serialize");
        let parsed: ServerConfig = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, config);
    }
}
