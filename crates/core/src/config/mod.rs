//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (UNFURL_*)
//! 2. TOML config file (if UNFURL_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (UNFURL_*)
/// 2. TOML config file (if UNFURL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite title cache database.
    ///
    /// Set via UNFURL_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via UNFURL_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Locale passed to provider oEmbed lookups.
    ///
    /// Set via UNFURL_LOCALE environment variable.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Overall fetch timeout in milliseconds, covering connect through body.
    ///
    /// Set via UNFURL_FETCH_TIMEOUT_MS environment variable.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Maximum redirects to follow per fetch.
    ///
    /// Set via UNFURL_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Maximum bytes to accept per response body.
    ///
    /// Set via UNFURL_MAX_BODY_BYTES environment variable.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Fetch gate width: concurrent network operations across the whole
    /// resolver, sized to leave headroom for several pages batching at once.
    ///
    /// Set via UNFURL_MAX_CONCURRENT_FETCHES environment variable.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Default request gate width for one resolve_batch call.
    ///
    /// Set via UNFURL_BATCH_PARALLELISM environment variable.
    #[serde(default = "default_batch_parallelism")]
    pub batch_parallelism: usize,

    /// Cache retention window in days; older entries are swept.
    ///
    /// Set via UNFURL_RETENTION_DAYS environment variable.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    /// Hours between eviction sweeps (the first sweep runs at startup).
    ///
    /// Set via UNFURL_SWEEP_INTERVAL_HOURS environment variable.
    #[serde(default = "default_sweep_interval_hours")]
    pub sweep_interval_hours: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./unfurl-cache.sqlite")
}

fn default_user_agent() -> String {
    "unfurl/0.1".into()
}

fn default_locale() -> String {
    "en".into()
}

fn default_fetch_timeout_ms() -> u64 {
    15_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_body_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_max_concurrent_fetches() -> usize {
    9
}

fn default_batch_parallelism() -> usize {
    3
}

fn default_retention_days() -> i64 {
    7
}

fn default_sweep_interval_hours() -> u64 {
    24
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            locale: default_locale(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            max_redirects: default_max_redirects(),
            max_body_bytes: default_max_body_bytes(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            batch_parallelism: default_batch_parallelism(),
            retention_days: default_retention_days(),
            sweep_interval_hours: default_sweep_interval_hours(),
        }
    }
}

impl AppConfig {
    /// Fetch timeout as Duration for use with reqwest/tokio.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Retention window for the eviction sweep.
    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::days(self.retention_days)
    }

    /// Interval between eviction sweeps.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_hours * 3600)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `UNFURL_`
    /// 2. TOML file from `UNFURL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("UNFURL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("UNFURL_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
