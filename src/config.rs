use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5601;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Reads `PLUGIN_STATUS_*` variables. Rejected values fall back to their
    /// defaults and are returned as warnings, since this usually runs before
    /// a logger is installed.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut warnings = Vec::new();

        let port = match var("PLUGIN_STATUS_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warnings.push(format!(
                    "Ignoring invalid PLUGIN_STATUS_PORT {:?}, using {}",
                    raw, defaults.port
                ));
                defaults.port
            }),
            None => defaults.port,
        };

        let config = Self {
            host: var("PLUGIN_STATUS_HOST").unwrap_or(defaults.host),
            port,
            log_level: var("PLUGIN_STATUS_LOG").unwrap_or(defaults.log_level),
        };
        (config, warnings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
