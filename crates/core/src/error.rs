//! Unified error types for respcache.
//!
//! Every variant renders with a stable code prefix so operator tooling can
//! match on it without parsing free-form text.

use std::time::Duration;

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Boxed error returned by a caller's compute function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error types for the response cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., status code out of range).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A stored row could not be decoded into a full record.
    #[error("INVALID_RECORD: {0}")]
    InvalidRecord(String),

    /// No cache entry found for the given key.
    ///
    /// The store itself reports misses as `None`; this variant is for
    /// surfaces that must turn a miss into an error.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// A migration procedure failed and was not recorded.
    #[error("MIGRATION_FAILED: {name}: {reason}")]
    MigrationFailed { name: String, reason: String },

    /// Migrations did not finish within the startup budget.
    #[error("MIGRATION_TIMEOUT: not finished after {0:?}")]
    MigrationTimeout(Duration),

    /// The caller's compute function failed.
    #[error("COMPUTE_FAILED: {0}")]
    Compute(#[source] BoxError),

    /// The caller's compute function did not finish in time.
    #[error("COMPUTE_TIMEOUT: not finished after {0:?}")]
    ComputeTimeout(Duration),
}

impl Error {
    /// Wrap a compute failure, keeping the original as the error source.
    pub fn compute(err: impl Into<BoxError>) -> Self {
        Error::Compute(err.into())
    }

    /// True for the two compute-side variants.
    pub fn is_compute(&self) -> bool {
        matches!(self, Error::Compute(_) | Error::ComputeTimeout(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::CacheMiss(_) => -32001,
            Error::Database(_) | Error::InvalidRecord(_) => -32002,
            Error::MigrationFailed { .. } | Error::MigrationTimeout(_) => -32003,
            Error::Compute(_) | Error::ComputeTimeout(_) => -32004,
        };
        let message = match err {
            Error::InvalidInput(msg) | Error::CacheMiss(msg) | Error::InvalidRecord(msg) => msg,
            other => other.to_string(),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CacheMiss("req:GET:/people".to_string());
        assert!(err.to_string().contains("CACHE_MISS"));
        assert!(err.to_string().contains("req:GET:/people"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::CacheMiss("abc123".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);
        assert_eq!(mcp_err.message, "abc123");
    }

    #[test]
    fn test_compute_keeps_source() {
        let inner = std::io::Error::other("upstream 502");
        let err = Error::compute(inner);
        assert!(err.is_compute());
        assert!(err.to_string().contains("upstream 502"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_migration_failed_display() {
        let err = Error::MigrationFailed { name: "003_broken".into(), reason: "no such table".into() };
        assert_eq!(err.to_string(), "MIGRATION_FAILED: 003_broken: no such table");
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32003);
    }
}
