use super::{ConfigError, GatewayConfig};

use std::io::Write;

use anyhow::Result;
use serial_test::serial;
use tempfile::Builder;

/// Sets an environment variable for the lifetime of the guard.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        //NOTE: Only sound while every test reading the environment runs under #[serial]
        unsafe { std::env::set_var(key, value) };
        Self(key)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe { std::env::remove_var(self.0) };
    }
}

#[test]
fn test_default_config() {
    let config = GatewayConfig::default();

    assert_eq!(config.database.url, "sqlite://vmb_gateway.db");
    assert_eq!(config.database.max_connections, 1);
    assert!(config.database.enforce_foreign_keys);
    assert_eq!(config.risk.deny_threshold, 0.8);
    assert_eq!(config.risk.flag_threshold, 0.4);
    assert_eq!(config.batch.backpressure, 256);
    assert_eq!(config.logging.level, "error");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let config = GatewayConfig::load_from_path(directory.path().join("absent.toml"))?;

    assert_eq!(config.risk.deny_threshold, 0.8);

    Ok(())
}

#[test]
#[serial]
fn test_file_values_override_defaults() -> Result<()> {
    let mut file = Builder::new().suffix(".toml").tempfile()?;

    writeln!(file, "[database]")?;
    writeln!(file, "url = \"sqlite::memory:\"")?;
    writeln!(file, "enforce_foreign_keys = false")?;
    writeln!(file, "[risk]")?;
    writeln!(file, "flag_threshold = 0.5")?;
    file.flush()?;

    let config = GatewayConfig::load_from_path(file.path())?;

    assert_eq!(config.database.url, "sqlite::memory:");
    assert!(!config.database.enforce_foreign_keys);
    assert_eq!(config.database.max_connections, 1);
    assert_eq!(config.risk.flag_threshold, 0.5);
    assert_eq!(config.risk.deny_threshold, 0.8);

    Ok(())
}

#[test]
#[serial]
fn test_inverted_thresholds_are_rejected() -> Result<()> {
    let mut file = Builder::new().suffix(".toml").tempfile()?;

    writeln!(file, "[risk]")?;
    writeln!(file, "deny_threshold = 0.3")?;
    writeln!(file, "flag_threshold = 0.6")?;
    file.flush()?;

    let result = GatewayConfig::load_from_path(file.path());

    assert!(matches!(result, Err(ConfigError::ThresholdsInverted { .. })));

    Ok(())
}

#[test]
fn test_out_of_range_threshold_is_rejected() {
    let mut config = GatewayConfig::default();
    config.risk.deny_threshold = 1.5;

    assert!(matches!(config.validate(), Err(ConfigError::ThresholdOutOfRange { name: "deny_threshold", .. })));
}

#[test]
fn test_zero_connections_are_rejected() {
    let mut config = GatewayConfig::default();
    config.database.max_connections = 0;

    assert!(matches!(config.validate(), Err(ConfigError::NoConnections)));
}

#[test]
#[serial]
fn test_environment_overrides_file_values() -> Result<()> {
    let mut file = Builder::new().suffix(".toml").tempfile()?;

    writeln!(file, "[risk]")?;
    writeln!(file, "deny_threshold = 0.7")?;
    writeln!(file, "[batch]")?;
    writeln!(file, "backpressure = 32")?;
    file.flush()?;

    let _deny = EnvGuard::set("VMB_RISK__DENY_THRESHOLD", "0.9");
    let _connections = EnvGuard::set("VMB_DATABASE__MAX_CONNECTIONS", "4");

    let config = GatewayConfig::load_from_path(file.path())?;

    assert_eq!(config.risk.deny_threshold, 0.9);
    assert_eq!(config.risk.flag_threshold, 0.4);
    assert_eq!(config.database.max_connections, 4);
    assert_eq!(config.batch.backpressure, 32);

    Ok(())
}
