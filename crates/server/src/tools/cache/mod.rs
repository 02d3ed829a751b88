//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and pruning the response cache.

pub mod get;
pub mod invalidate;
pub mod purge;
pub mod stats;

pub use get::{CacheGetParams, get_impl};
pub use invalidate::{CacheInvalidateParams, invalidate_impl};
pub use purge::{CachePurgeParams, purge_impl};
pub use stats::stats_impl;
