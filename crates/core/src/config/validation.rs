//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_body_bytes` is 0 or exceeds 50MB
    /// - `fetch_timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `locale` is empty
    /// - either gate width is 0, or `max_concurrent_fetches` exceeds 64
    /// - `retention_days` or `sweep_interval_hours` is not positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_body_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_body_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_body_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.fetch_timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "fetch_timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.fetch_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "fetch_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }
        if self.locale.is_empty() {
            return Err(ConfigError::Invalid { field: "locale".into(), reason: "must not be empty".into() });
        }

        if self.max_concurrent_fetches == 0 {
            return Err(ConfigError::Invalid {
                field: "max_concurrent_fetches".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.max_concurrent_fetches > 64 {
            return Err(ConfigError::Invalid {
                field: "max_concurrent_fetches".into(),
                reason: "must not exceed 64".into(),
            });
        }
        if self.batch_parallelism == 0 {
            return Err(ConfigError::Invalid { field: "batch_parallelism".into(), reason: "must be at least 1".into() });
        }

        if self.retention_days < 1 {
            return Err(ConfigError::Invalid { field: "retention_days".into(), reason: "must be at least 1".into() });
        }
        if self.sweep_interval_hours == 0 {
            return Err(ConfigError::Invalid {
                field: "sweep_interval_hours".into(),
                reason: "must be at least 1".into(),
            });
        }

        if self.batch_parallelism > self.max_concurrent_fetches {
            tracing::warn!(
                batch_parallelism = self.batch_parallelism,
                max_concurrent_fetches = self.max_concurrent_fetches,
                "batch_parallelism exceeds the fetch gate width; \
                 batches will queue at the fetch gate"
            );
        }

        Ok(())
    }
}
