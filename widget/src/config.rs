//! Widget configuration.

use std::time::Duration;

use rupeeconv_common::Unit;
use rupeeconv_fx::exchange_rate_api::{ExchangeRateApiConfig, DEFAULT_BASE_URL};
use rupeeconv_fx::RateStrategy;
use thiserror::Error;

/// Configuration errors. These abort start-up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds a value that does not parse.
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// Rate service URL is empty.
    #[error("Rate service URL cannot be empty")]
    EmptyBaseUrl,

    /// Request timeout is zero.
    #[error("Rate request timeout cannot be zero")]
    ZeroTimeout,
}

/// Main widget configuration.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Live fetch with fallback, or the fixed rate.
    pub strategy: RateStrategy,
    /// Rate service base URL.
    pub api_base_url: String,
    /// Rate service API key.
    pub api_key: Option<String>,
    /// Rate request timeout.
    pub request_timeout: Duration,
    /// Unit preselected in the selector.
    pub default_unit: Unit,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            strategy: RateStrategy::Live,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(10),
            default_unit: Unit::Lakhs,
            log_level: "info".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through a variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup("EXCHANGE_RATE_API_KEY") {
            if !key.trim().is_empty() {
                config.api_key = Some(key.trim().to_string());
            }
        }

        if let Some(url) = lookup("EXCHANGE_RATE_API_URL") {
            config.api_base_url = url;
        }

        if let Some(strategy) = lookup("RATE_STRATEGY") {
            config.strategy = strategy.parse().map_err(|reason| ConfigError::InvalidValue {
                var: "RATE_STRATEGY",
                value: strategy.clone(),
                reason,
            })?;
        }

        if let Some(secs) = lookup("RATE_REQUEST_TIMEOUT_SECS") {
            let parsed: u64 = secs.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    var: "RATE_REQUEST_TIMEOUT_SECS",
                    value: secs.clone(),
                    reason: e.to_string(),
                }
            })?;
            config.request_timeout = Duration::from_secs(parsed);
        }

        if let Some(unit) = lookup("DEFAULT_UNIT") {
            config.default_unit = unit.parse().map_err(|e: rupeeconv_common::ValidationError| {
                ConfigError::InvalidValue {
                    var: "DEFAULT_UNIT",
                    value: unit.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategy == RateStrategy::Fixed {
            return Ok(());
        }

        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }

    /// Settings for the live rate provider.
    pub fn api_config(&self) -> ExchangeRateApiConfig {
        ExchangeRateApiConfig {
            base_url: self.api_base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.request_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = WidgetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.strategy, RateStrategy::Live);
        assert_eq!(config.default_unit, Unit::Lakhs);
    }

    #[test]
    fn test_from_lookup() {
        let config = WidgetConfig::from_lookup(lookup_from(&[
            ("EXCHANGE_RATE_API_KEY", "abc123"),
            ("EXCHANGE_RATE_API_URL", "http://localhost:8080"),
            ("RATE_STRATEGY", "fixed"),
            ("RATE_REQUEST_TIMEOUT_SECS", "3"),
            ("DEFAULT_UNIT", "crores"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.strategy, RateStrategy::Fixed);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.default_unit, Unit::Crores);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_blank_key_is_absent() {
        let config = WidgetConfig::from_lookup(lookup_from(&[("EXCHANGE_RATE_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_values() {
        let err = WidgetConfig::from_lookup(lookup_from(&[("RATE_STRATEGY", "cached")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "RATE_STRATEGY", .. }));

        let err =
            WidgetConfig::from_lookup(lookup_from(&[("RATE_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "RATE_REQUEST_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = WidgetConfig::default();
        config.request_timeout = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));

        config.request_timeout = Duration::from_secs(1);
        config.api_base_url = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyBaseUrl));

        config.strategy = RateStrategy::Fixed;
        assert!(config.validate().is_ok());
    }
}
