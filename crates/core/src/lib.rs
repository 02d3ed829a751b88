//! Core types and shared functionality for respcache.
//!
//! This crate provides:
//! - Response cache implementation with SQLite backend
//! - Schema migration runner
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheDb, CachedResponse, FreshnessPolicy, Lookup, ResponseCache, ResponseParts};
pub use config::AppConfig;
pub use error::Error;
