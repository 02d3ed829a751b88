//! Cached response CRUD operations.
//!
//! The store persists whole records and answers point lookups. Freshness
//! decisions live in [`super::access`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::clock::{format_timestamp, parse_timestamp, truncate};
use super::connection::CacheDb;
use crate::Error;

/// Header name to value. Sorted so equality does not depend on insertion order.
pub type Headers = BTreeMap<String, String>;

/// The `(status, body, headers)` triple produced by an upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ResponseParts {
    pub status: u16,
    pub body: String,
    #[serde(default)]
    pub headers: Headers,
}

impl ResponseParts {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into(), headers: Headers::new() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Reject status codes outside 100..=599.
    pub fn validate(&self) -> Result<(), Error> {
        check_status(self.status)
    }
}

/// A cached upstream response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CachedResponse {
    pub key: String,
    pub status: u16,
    pub body: String,
    pub headers: Headers,
    pub inserted_at: DateTime<Utc>,
}

impl CachedResponse {
    /// Stamp `parts` with `key` and the insertion time.
    pub fn new(key: impl Into<String>, parts: ResponseParts, inserted_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            status: parts.status,
            body: parts.body,
            headers: parts.headers,
            inserted_at: truncate(inserted_at),
        }
    }

    /// Age relative to `now`. Negative if the record is from the future.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.inserted_at
    }

    pub fn parts(&self) -> ResponseParts {
        ResponseParts { status: self.status, body: self.body.clone(), headers: self.headers.clone() }
    }
}

/// Aggregate view of the table for operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheStats {
    pub entries: u64,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

fn check_status(status: u16) -> Result<(), Error> {
    if !(100..=599).contains(&status) {
        return Err(Error::InvalidInput(format!("status {status} outside 100..=599")));
    }
    Ok(())
}

type RawRow = (String, i64, String, String, String);

fn decode(raw: RawRow) -> Result<CachedResponse, Error> {
    let (key, status, body, headers_json, inserted_at) = raw;
    let status = u16::try_from(status).map_err(|_| Error::InvalidRecord(format!("{key}: status {status}")))?;
    let headers: Headers = serde_json::from_str(&headers_json)
        .map_err(|e| Error::InvalidRecord(format!("{key}: headers: {e}")))?;
    let inserted_at = parse_timestamp(&inserted_at)?;
    Ok(CachedResponse { key, status, body, headers, inserted_at })
}

impl CacheDb {
    /// Insert or replace a cached response.
    ///
    /// Every column is overwritten in one statement, so readers see either the
    /// old record or the new one.
    pub async fn put_response(&self, record: &CachedResponse) -> Result<(), Error> {
        check_status(record.status)?;
        let headers_json = serde_json::to_string(&record.headers)
            .map_err(|e| Error::InvalidInput(format!("headers: {e}")))?;
        let key = record.key.clone();
        let status = i64::from(record.status);
        let body = record.body.clone();
        let inserted_at = format_timestamp(record.inserted_at);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO cached_response (key, status, body, headers, inserted_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(key) DO UPDATE SET
                        status = excluded.status,
                        body = excluded.body,
                        headers = excluded.headers,
                        inserted_at = excluded.inserted_at",
                    params![key, status, body, headers_json, inserted_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get a cached response by key.
    ///
    /// Returns None if the key doesn't exist in the cache.
    pub async fn get_response(&self, key: &str) -> Result<Option<CachedResponse>, Error> {
        let key = key.to_string();
        let raw = self
            .conn
            .call(move |conn| -> Result<Option<RawRow>, Error> {
                let mut stmt = conn
                    .prepare_cached("SELECT key, status, body, headers, inserted_at FROM cached_response WHERE key = ?1")?;

                let result = stmt.query_row(params![key], |row| -> rusqlite::Result<RawRow> {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
                });

                match result {
                    Ok(raw) => Ok(Some(raw)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        raw.map(decode).transpose()
    }

    /// Delete a cached response.
    ///
    /// Returns whether a row was removed. A missing key is not an error.
    pub async fn delete_response(&self, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM cached_response WHERE key = ?1", params![key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every response whose key starts with `prefix`.
    ///
    /// The match is literal; `%` and `_` in the prefix have no special meaning.
    /// Returns the number of deleted entries.
    pub async fn delete_responses_with_prefix(&self, prefix: &str) -> Result<u64, Error> {
        let prefix = prefix.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM cached_response WHERE substr(key, 1, length(?1)) = ?1",
                    params![prefix],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete responses under `prefix` whose body contains `needle`.
    ///
    /// Returns the number of deleted entries.
    pub async fn delete_responses_containing(&self, prefix: &str, needle: &str) -> Result<u64, Error> {
        let prefix = prefix.to_string();
        let needle = needle.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM cached_response
                    WHERE substr(key, 1, length(?1)) = ?1 AND instr(body, ?2) > 0",
                    params![prefix, needle],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete responses inserted strictly before `cutoff`.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_responses_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let cutoff = format_timestamp(cutoff);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM cached_response WHERE inserted_at < ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Purge oldest entries until count <= max_entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_oldest_responses(&self, max_entries: usize) -> Result<u64, Error> {
        let max = i64::try_from(max_entries).unwrap_or(i64::MAX);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM cached_response", [], |row| row.get(0))?;
                if count <= max {
                    return Ok(0);
                }

                let to_delete = count - max;
                let deleted = conn.execute(
                    "DELETE FROM cached_response WHERE key IN (
                    SELECT key FROM cached_response ORDER BY inserted_at ASC, key ASC LIMIT ?1
                )",
                    params![to_delete],
                )?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Count entries and report the insertion time range.
    pub async fn response_stats(&self) -> Result<CacheStats, Error> {
        let (entries, oldest, newest) = self
            .conn
            .call(|conn| -> Result<(i64, Option<String>, Option<String>), Error> {
                let row: (i64, Option<String>, Option<String>) = conn.query_row(
                    "SELECT COUNT(*), MIN(inserted_at), MAX(inserted_at) FROM cached_response",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )?;
                Ok(row)
            })
            .await
            .map_err(Error::from)?;

        Ok(CacheStats {
            entries: entries as u64,
            oldest: oldest.as_deref().map(parse_timestamp).transpose()?,
            newest: newest.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}
