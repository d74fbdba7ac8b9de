//! Configuration management for the uptime pinger

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Probe timeout used when a service does not set one.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// History length used when a service does not set `keepHistory`.
pub const DEFAULT_KEEP_HISTORY: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the JSON list of services to check
    pub services_file: PathBuf,

    /// Path of the status document that is read and rewritten each run
    pub status_file: PathBuf,

    /// Probe timeout for services without an explicit `timeout`
    pub default_timeout: Duration,

    /// Retained samples for services without an explicit `keepHistory`
    pub default_keep_history: usize,

    /// Maximum number of probes in flight at once
    pub max_concurrency: usize,

    /// User agent sent with every probe
    pub user_agent: String,

    /// Redirect hops followed before a probe gives up
    pub max_redirects: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            services_file: PathBuf::from("services.json"),
            status_file: PathBuf::from("docs/statuses.json"),
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            default_keep_history: DEFAULT_KEEP_HISTORY,
            max_concurrency: 8,
            user_agent: format!("uptime_pinger/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(services_file) = env::var("SERVICES_FILE") {
            config.services_file = PathBuf::from(services_file);
        }

        if let Ok(status_file) = env::var("STATUS_FILE") {
            config.status_file = PathBuf::from(status_file);
        }

        if let Ok(timeout) = env::var("DEFAULT_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse::<u64>() {
                config.default_timeout = Duration::from_millis(ms);
            }
        }

        if let Ok(keep_history) = env::var("DEFAULT_KEEP_HISTORY") {
            if let Ok(keep) = keep_history.parse() {
                config.default_keep_history = keep;
            }
        }

        if let Ok(concurrency) = env::var("MAX_CONCURRENCY") {
            if let Ok(n) = concurrency.parse() {
                config.max_concurrency = n;
            }
        }

        if let Ok(user_agent) = env::var("USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(redirects) = env::var("MAX_REDIRECTS") {
            if let Ok(n) = redirects.parse() {
                config.max_redirects = n;
            }
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.services_file.as_os_str().is_empty() {
            return Err("services_file cannot be empty".to_string());
        }

        if self.status_file.as_os_str().is_empty() {
            return Err("status_file cannot be empty".to_string());
        }

        if self.default_timeout.is_zero() {
            return Err("default_timeout must be greater than 0".to_string());
        }

        if self.default_keep_history == 0 {
            return Err("default_keep_history must be greater than 0".to_string());
        }

        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_timeout, Duration::from_millis(10_000));
        assert_eq!(config.default_keep_history, 100);
        assert_eq!(config.status_file, PathBuf::from("docs/statuses.json"));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = Config {
            default_keep_history: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_concurrency: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            default_timeout: Duration::ZERO,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let config = Config {
            status_file: PathBuf::new(),
            ..Config::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            "status_file cannot be empty"
        );
    }
}
