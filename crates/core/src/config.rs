//! Environment-driven configuration.

use std::env;
use std::time::Duration;

use sltrack_api::Credentials;
use thiserror::Error;

const DEFAULT_SCAN_INTERVAL_SECS: u64 = 120;

/// Configuration error naming the offending variable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} undefined")]
    Missing(&'static str),

    #[error("{name} invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Runtime configuration, read from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub username: String,
    pub password: String,
    pub app_id: String,
    pub app_secret: String,
    pub scan_interval: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("scan_interval", &self.scan_interval)
            .finish()
    }
}

impl Config {
    /// Read configuration from `SLTRACK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            match var(name) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(ConfigError::Missing(name)),
            }
        };

        let scan_interval_secs = match var("SLTRACK_SCAN_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::Invalid {
                    name: "SLTRACK_SCAN_INTERVAL_SECS",
                    message: e.to_string(),
                })?,
            None => DEFAULT_SCAN_INTERVAL_SECS,
        };
        if scan_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "SLTRACK_SCAN_INTERVAL_SECS",
                message: "must be positive".to_string(),
            });
        }

        Ok(Self {
            username: required("SLTRACK_USERNAME")?,
            password: required("SLTRACK_PASSWORD")?,
            app_id: required("SLTRACK_APP_ID")?,
            app_secret: required("SLTRACK_APP_SECRET")?,
            scan_interval: Duration::from_secs(scan_interval_secs),
        })
    }

    /// Vendor credentials for the API client.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            app_id: self.app_id.clone(),
            app_secret: self.app_secret.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(entries: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        entries
            .iter()
            .map(|(name, value)| (*name, value.to_string()))
            .collect()
    }

    fn full_vars() -> HashMap<&'static str, String> {
        vars(&[
            ("SLTRACK_USERNAME", "user"),
            ("SLTRACK_PASSWORD", "hunter2"),
            ("SLTRACK_APP_ID", "123"),
            ("SLTRACK_APP_SECRET", "s3cr3t"),
        ])
    }

    #[test]
    fn defaults_scan_interval_to_two_minutes() {
        let env = full_vars();
        let config = Config::from_vars(|name| env.get(name).cloned()).unwrap();
        assert_eq!(config.scan_interval, Duration::from_secs(120));
    }

    #[test]
    fn missing_required_variable_is_named() {
        let mut env = full_vars();
        env.remove("SLTRACK_PASSWORD");
        let err = Config::from_vars(|name| env.get(name).cloned()).unwrap_err();
        assert!(err.to_string().contains("SLTRACK_PASSWORD"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut env = full_vars();
        env.insert("SLTRACK_SCAN_INTERVAL_SECS", "0".to_string());
        let err = Config::from_vars(|name| env.get(name).cloned()).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn custom_interval_is_parsed() {
        let mut env = full_vars();
        env.insert("SLTRACK_SCAN_INTERVAL_SECS", "30".to_string());
        let config = Config::from_vars(|name| env.get(name).cloned()).unwrap();
        assert_eq!(config.scan_interval, Duration::from_secs(30));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let env = full_vars();
        let config = Config::from_vars(|name| env.get(name).cloned()).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cr3t"));
    }
}
