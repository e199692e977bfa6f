//! Layered configuration for the gateway.
//!
//! Values are resolved from built-in defaults, then an optional TOML file, then
//! `VMB_`-prefixed environment variables (`__` separates nested keys, e.g.
//! `VMB_RISK__DENY_THRESHOLD=0.9`). Command line flags are applied last by the caller.

#[cfg(test)]
mod tests;

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::gateway::RiskPolicy;

pub const DEFAULT_CONFIG_PATH: &str = "vmb_gateway.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration could not be loaded: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Risk threshold [{name}] must be within 0.0 and 1.0, got [{value}]")]
    ThresholdOutOfRange {
        name: &'static str,
        value: f64
    },
    #[error("Flag threshold [{flag_threshold}] must not exceed deny threshold [{deny_threshold}]")]
    ThresholdsInverted {
        flag_threshold: f64,
        deny_threshold: f64
    },
    #[error("Database pool needs at least one connection")]
    NoConnections,
    #[error("Batch backpressure must be at least 1")]
    NoBackpressure
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub database: DatabaseConfig,
    pub risk: RiskPolicy,
    pub batch: BatchConfig,
    pub logging: LoggingConfig
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://vmb_gateway.db` or `sqlite::memory:`.
    pub url: String,
    /// SQLite allows a single writer; extra connections queue on its busy timeout.
    pub max_connections: u32,
    pub enforce_foreign_keys: bool
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://vmb_gateway.db".to_string(),
            max_connections: 1,
            enforce_foreign_keys: true
        }
    }
}

impl DatabaseConfig {
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Capacity of the channel between the CSV reader and the dispatcher.
    pub backpressure: usize
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { backpressure: 256 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "error".to_string() }
    }
}

impl GatewayConfig {
    /// Loads configuration, treating a missing file as empty.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: GatewayConfig = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("VMB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("deny_threshold", self.risk.deny_threshold),
            ("flag_threshold", self.risk.flag_threshold)
        ];

        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }

        if self.risk.flag_threshold > self.risk.deny_threshold {
            return Err(ConfigError::ThresholdsInverted {
                flag_threshold: self.risk.flag_threshold,
                deny_threshold: self.risk.deny_threshold
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::NoConnections);
        }

        if self.batch.backpressure == 0 {
            return Err(ConfigError::NoBackpressure);
        }

        Ok(())
    }
}
