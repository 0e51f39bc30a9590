//! Service configuration resolved from environment variables.
//!
//! Everything has a sensible default so `tenderbid serve` works out of the
//! box; `.env` files are loaded by `main` before resolution.

mod helpers;

use std::path::PathBuf;

use crate::error::ConfigError;
use helpers::{optional_env, parse_optional_env};

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Resolve the full configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::resolve()?,
            storage: StorageConfig::resolve()?,
        })
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind (default: 127.0.0.1).
    pub host: String,
    /// Port to bind (default: 8080).
    pub port: u16,
}

impl ServerConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            host: optional_env("TENDERBID_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_optional_env("TENDERBID_PORT", 8080)?,
        })
    }
}

/// Flat-file storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding `products.json` and `proposals.json`
    /// (default: ./data).
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            data_dir: optional_env("TENDERBID_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
        })
    }
}
