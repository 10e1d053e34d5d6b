use crate::config;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Runtime configuration for the web server
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: config::DEFAULT_PORT,
            static_dir: PathBuf::from(config::DEFAULT_STATIC_DIR),
        }
    }
}

impl AppConfig {
    /// Create new configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: lookup("NSE_PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(config::DEFAULT_PORT),
            static_dir: lookup("NSE_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(config::DEFAULT_STATIC_DIR)),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("Port must be non-zero");
        }
        Ok(())
    }
}
