//! SQLite-backed cache for upstream HTTP responses.
//!
//! This module provides a persistent response cache using SQLite with async
//! access via tokio-rusqlite. It supports:
//!
//! - Whole-record upserts keyed by request fingerprint
//! - Named, ordered schema migrations
//! - Configurable durability (WAL, or unlogged for throughput)
//! - Freshness checks, stale-while-revalidate and optional single-flight
//! - Invalidation by key, key prefix, or body content

pub mod access;
pub mod clock;
pub mod connection;
mod flight;
pub mod hash;
pub mod migrations;
pub mod responses;

pub use crate::Error;

pub use access::{FreshnessPolicy, Lookup, ResponseCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use connection::{CacheDb, Durability, StoreOptions};
pub use migrations::{Migration, MigrationRecord};
pub use responses::{CacheStats, CachedResponse, Headers, ResponseParts};
