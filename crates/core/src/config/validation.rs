//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::cache::Durability;
use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `db_path` is empty, and
    /// `ConfigError::Invalid` if:
    /// - `migration_timeout_ms` is less than 100ms or exceeds 10 minutes
    /// - `compute_timeout_ms` is non-zero and below 10ms, or exceeds 5 minutes
    /// - `valid_for_secs` is 0
    /// - `fresh_for_secs` exceeds `valid_for_secs`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "db_path".into(),
                hint: "Set RESPCACHE_DB_PATH environment variable".into(),
            });
        }

        if self.migration_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "migration_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.migration_timeout_ms > 600_000 {
            return Err(ConfigError::Invalid {
                field: "migration_timeout_ms".into(),
                reason: "must not exceed 10 minutes (600000ms)".into(),
            });
        }

        if self.compute_timeout_ms != 0 && self.compute_timeout_ms < 10 {
            return Err(ConfigError::Invalid {
                field: "compute_timeout_ms".into(),
                reason: "must be 0 (disabled) or at least 10ms".into(),
            });
        }
        if self.compute_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "compute_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.valid_for_secs == 0 {
            return Err(ConfigError::Invalid { field: "valid_for_secs".into(), reason: "must be greater than 0".into() });
        }
        if self.fresh_for_secs > self.valid_for_secs {
            return Err(ConfigError::Invalid {
                field: "fresh_for_secs".into(),
                reason: format!("must not exceed valid_for_secs ({})", self.valid_for_secs),
            });
        }

        if self.durability == Durability::Off {
            tracing::warn!(
                db_path = %self.db_path.display(),
                "durability is off; the cache file may need deleting after a crash"
            );
        }

        Ok(())
    }
}
