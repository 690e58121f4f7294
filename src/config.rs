//! # Configuration
//!
//! Engine configuration with environment-variable overrides.
//!
//! Defaults are sensible for embedding; deployments override them with
//! `RFQ_ENGINE_*` variables.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RFQ_ENGINE_NUMBER_PREFIX` | RFQ number prefix | `RFQ` |
//! | `RFQ_ENGINE_MAX_RETRIES` | Write retries after a lost race | `3` |
//! | `RFQ_ENGINE_RETRY_INITIAL_DELAY_MS` | First backoff delay | `25` |
//! | `RFQ_ENGINE_RETRY_MAX_DELAY_MS` | Backoff delay cap | `1000` |
//! | `RFQ_ENGINE_DEFAULT_DUE_DAYS` | Default quoting window | `14` |
//! | `RFQ_ENGINE_DEFAULT_VALIDITY_DAYS` | Default quote validity window | `30` |

use crate::application::services::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An override held a value of the wrong shape.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// What was wrong.
        message: String,
    },
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Prefix for generated RFQ numbers.
    #[serde(default = "default_number_prefix")]
    pub number_prefix: String,

    /// Retries after a lost optimistic-concurrency race.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay, in milliseconds.
    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,

    /// Backoff delay cap, in milliseconds.
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,

    /// Default quoting window for new RFQs, in days.
    #[serde(default = "default_due_days")]
    pub default_due_days: i64,

    /// Default quote validity window, in days.
    #[serde(default = "default_validity_days")]
    pub default_validity_days: i64,
}

fn default_number_prefix() -> String {
    "RFQ".to_owned()
}
const fn default_max_retries() -> u32 {
    3
}
const fn default_retry_initial_delay_ms() -> u64 {
    25
}
const fn default_retry_max_delay_ms() -> u64 {
    1_000
}
const fn default_due_days() -> i64 {
    14
}
const fn default_validity_days() -> i64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            number_prefix: default_number_prefix(),
            max_retries: default_max_retries(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
            default_due_days: default_due_days(),
            default_validity_days: default_validity_days(),
        }
    }
}

impl EngineConfig {
    /// Loads defaults, then applies `RFQ_ENGINE_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when an override cannot be
    /// parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(prefix) = std::env::var("RFQ_ENGINE_NUMBER_PREFIX") {
            config.number_prefix = prefix;
        }
        config.max_retries = parse_env("RFQ_ENGINE_MAX_RETRIES", config.max_retries)?;
        config.retry_initial_delay_ms = parse_env(
            "RFQ_ENGINE_RETRY_INITIAL_DELAY_MS",
            config.retry_initial_delay_ms,
        )?;
        config.retry_max_delay_ms =
            parse_env("RFQ_ENGINE_RETRY_MAX_DELAY_MS", config.retry_max_delay_ms)?;
        config.default_due_days =
            parse_env("RFQ_ENGINE_DEFAULT_DUE_DAYS", config.default_due_days)?;
        config.default_validity_days = parse_env(
            "RFQ_ENGINE_DEFAULT_VALIDITY_DAYS",
            config.default_validity_days,
        )?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty prefix or a
    /// validity window shorter than the quoting window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.number_prefix.is_empty() || !self.number_prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidValue {
                field: "number_prefix",
                message: "must be non-empty and ASCII alphanumeric".to_owned(),
            });
        }
        if self.default_due_days < 1 {
            return Err(ConfigError::InvalidValue {
                field: "default_due_days",
                message: "must be at least 1".to_owned(),
            });
        }
        if self.default_validity_days < self.default_due_days {
            return Err(ConfigError::InvalidValue {
                field: "default_validity_days",
                message: "must not be shorter than default_due_days".to_owned(),
            });
        }
        Ok(())
    }

    /// Builds the retry policy the service facade uses for writes.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            self.retry_initial_delay_ms,
            self.retry_max_delay_ms,
            2.0,
            0.2,
        )
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, current: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: name,
            message: e.to_string(),
        }),
        Err(_) => Ok(current),
    }
}
