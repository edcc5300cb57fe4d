//! Configuration for the habits application.
//!
//! Loaded from environment variables (after `.env`, if present) with
//! defaults for everything.

use habitkit_runtime::StoreConfig;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Filter directive used when neither `HABITS_LOG` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "habits=info,habitkit_runtime=info";

/// Errors raised while reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value does not parse
    #[error("invalid value `{value}` for {key}: {reason}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
        /// Parser message
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `tracing` filter directive (`HABITS_LOG`, falling back to `RUST_LOG`)
    pub log_filter: String,
    /// Buffered applied actions per slow observer (`HABITS_BROADCAST_CAPACITY`, default 16)
    pub broadcast_capacity: usize,
    /// Seconds to wait for in-flight effects on exit (`HABITS_SHUTDOWN_TIMEOUT_SECS`, default 5)
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            log_filter: lookup("HABITS_LOG")
                .or_else(|| lookup("RUST_LOG"))
                .filter(|filter| !filter.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            broadcast_capacity: parse_var(&lookup, "HABITS_BROADCAST_CAPACITY")?
                .unwrap_or(defaults.broadcast_capacity),
            shutdown_timeout_secs: parse_var(&lookup, "HABITS_SHUTDOWN_TIMEOUT_SECS")?
                .unwrap_or(defaults.shutdown_timeout_secs),
        })
    }

    /// Graceful shutdown timeout
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .with_action_broadcast_capacity(self.broadcast_capacity)
            .with_shutdown_timeout(self.shutdown_timeout())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            broadcast_capacity: 16,
            shutdown_timeout_secs: 5,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };

    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        })
}
