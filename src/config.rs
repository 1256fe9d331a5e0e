//! Configuration management for pw-practice

use crate::session::Timeouts;
use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Suite configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chrome remote debugging endpoint
    pub cdp_endpoint: String,

    /// Page load budget in milliseconds
    pub navigation_timeout_ms: u64,

    /// Implicit wait budget for element actions in milliseconds
    pub action_timeout_ms: u64,

    /// Retry budget for `expect` assertions in milliseconds
    pub expect_timeout_ms: u64,

    /// Delay between polls while waiting, in milliseconds
    pub poll_interval_ms: u64,

    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cdp_endpoint: "ws://localhost:9222".to_string(),
            navigation_timeout_ms: 30000,
            action_timeout_ms: 5000,
            expect_timeout_ms: 5000,
            poll_interval_ms: 100,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(endpoint) = env::var("PW_CDP_ENDPOINT") {
            config.cdp_endpoint = endpoint;
        }

        if let Ok(timeout) = env::var("PW_NAVIGATION_TIMEOUT") {
            config.navigation_timeout_ms = timeout
                .parse()
                .map_err(|_| Error::configuration("Invalid PW_NAVIGATION_TIMEOUT"))?;
        }

        if let Ok(timeout) = env::var("PW_ACTION_TIMEOUT") {
            config.action_timeout_ms = timeout
                .parse()
                .map_err(|_| Error::configuration("Invalid PW_ACTION_TIMEOUT"))?;
        }

        if let Ok(timeout) = env::var("PW_EXPECT_TIMEOUT") {
            config.expect_timeout_ms = timeout
                .parse()
                .map_err(|_| Error::configuration("Invalid PW_EXPECT_TIMEOUT"))?;
        }

        if let Ok(interval) = env::var("PW_POLL_INTERVAL") {
            config.poll_interval_ms = interval
                .parse()
                .map_err(|_| Error::configuration("Invalid PW_POLL_INTERVAL"))?;
        }

        if let Ok(log_level) = env::var("PW_LOG_LEVEL") {
            config.log_level = log_level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Session timeouts derived from this configuration
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            navigation: Duration::from_millis(self.navigation_timeout_ms),
            action: Duration::from_millis(self.action_timeout_ms),
            expect: Duration::from_millis(self.expect_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::configuration("poll interval must be greater than zero"));
        }
        if !(self.cdp_endpoint.starts_with("ws://")
            || self.cdp_endpoint.starts_with("wss://")
            || self.cdp_endpoint.starts_with("http://")
            || self.cdp_endpoint.starts_with("https://"))
        {
            return Err(Error::configuration(format!(
                "Unsupported CDP endpoint scheme: {}",
                self.cdp_endpoint
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let timeouts = Config::default().timeouts();
        assert_eq!(timeouts.navigation, Duration::from_secs(30));
        assert_eq!(timeouts.action, Duration::from_secs(5));
        assert_eq!(timeouts.expect, Duration::from_secs(5));
        assert_eq!(timeouts.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml(
            r#"
            cdp_endpoint = "ws://127.0.0.1:9333"
            expect_timeout_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(config.cdp_endpoint, "ws://127.0.0.1:9333");
        assert_eq!(config.expect_timeout_ms, 1500);
        assert_eq!(config.action_timeout_ms, 5000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_from_toml_rejects_zero_poll_interval() {
        let result = Config::from_toml("poll_interval_ms = 0");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_from_toml_rejects_bad_endpoint() {
        let result = Config::from_toml(r#"cdp_endpoint = "localhost:9222""#);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file("/nonexistent/pw-practice.toml");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_from_env_overrides() {
        let vars = [
            ("PW_CDP_ENDPOINT", "ws://127.0.0.1:9333"),
            ("PW_NAVIGATION_TIMEOUT", "45000"),
            ("PW_ACTION_TIMEOUT", "2500"),
            ("PW_EXPECT_TIMEOUT", "7000"),
            ("PW_POLL_INTERVAL", "50"),
            ("PW_LOG_LEVEL", "debug"),
        ];
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let config = Config::from_env();

        env::set_var("PW_ACTION_TIMEOUT", "abc");
        let invalid = Config::from_env();

        for (key, _) in vars {
            env::remove_var(key);
        }

        let config = config.unwrap();
        assert_eq!(config.cdp_endpoint, "ws://127.0.0.1:9333");
        assert_eq!(config.navigation_timeout_ms, 45000);
        assert_eq!(config.action_timeout_ms, 2500);
        assert_eq!(config.expect_timeout_ms, 7000);
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.log_level, "debug");

        assert!(matches!(invalid, Err(Error::Configuration(msg)) if msg.contains("PW_ACTION_TIMEOUT")));
    }
}
