//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (RESPCACHE_*)
//! 2. TOML config file (if RESPCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::{Durability, FreshnessPolicy, StoreOptions};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (RESPCACHE_*)
/// 2. TOML config file (if RESPCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via RESPCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Crash durability of the cache file: `full`, `normal` or `off`.
    ///
    /// Set via RESPCACHE_DURABILITY environment variable.
    #[serde(default)]
    pub durability: Durability,

    /// How long startup waits for schema migrations, in milliseconds.
    ///
    /// Set via RESPCACHE_MIGRATION_TIMEOUT_MS environment variable.
    #[serde(default = "default_migration_timeout_ms")]
    pub migration_timeout_ms: u64,

    /// Default limit for upstream compute calls in milliseconds. 0 disables it.
    ///
    /// Set via RESPCACHE_COMPUTE_TIMEOUT_MS environment variable.
    #[serde(default = "default_compute_timeout_ms")]
    pub compute_timeout_ms: u64,

    /// Age below which entries are served without a refresh.
    ///
    /// Set via RESPCACHE_FRESH_FOR_SECS environment variable.
    #[serde(default = "default_fresh_for_secs")]
    pub fresh_for_secs: u64,

    /// Age above which entries are no longer served.
    ///
    /// Set via RESPCACHE_VALID_FOR_SECS environment variable.
    #[serde(default = "default_valid_for_secs")]
    pub valid_for_secs: u64,

    /// Coalesce concurrent recomputes of the same key.
    ///
    /// Set via RESPCACHE_SINGLE_FLIGHT environment variable.
    #[serde(default)]
    pub single_flight: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./respcache.sqlite")
}

fn default_migration_timeout_ms() -> u64 {
    30_000
}

fn default_compute_timeout_ms() -> u64 {
    20_000
}

fn default_fresh_for_secs() -> u64 {
    3 * 60
}

fn default_valid_for_secs() -> u64 {
    5 * 60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            durability: Durability::default(),
            migration_timeout_ms: default_migration_timeout_ms(),
            compute_timeout_ms: default_compute_timeout_ms(),
            fresh_for_secs: default_fresh_for_secs(),
            valid_for_secs: default_valid_for_secs(),
            single_flight: false,
        }
    }
}

impl AppConfig {
    pub fn migration_timeout(&self) -> Duration {
        Duration::from_millis(self.migration_timeout_ms)
    }

    /// Compute timeout, or `None` when set to 0.
    pub fn compute_timeout(&self) -> Option<Duration> {
        (self.compute_timeout_ms > 0).then(|| Duration::from_millis(self.compute_timeout_ms))
    }

    pub fn freshness(&self) -> FreshnessPolicy {
        FreshnessPolicy {
            fresh_for: Duration::from_secs(self.fresh_for_secs),
            valid_for: Duration::from_secs(self.valid_for_secs),
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions { durability: self.durability, migration_timeout: self.migration_timeout() }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `RESPCACHE_`
    /// 2. TOML file from `RESPCACHE_CONFIG_FILE` (if set)
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

        if let Ok(config_path) = std::env::var("RESPCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("RESPCACHE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
