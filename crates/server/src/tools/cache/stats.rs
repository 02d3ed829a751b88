//! cache_stats tool implementation.

use respcache_core::ResponseCache;
use respcache_core::cache::{CacheStats, MigrationRecord};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Output from the cache_stats tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatsOutput {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Schema migrations applied to this database, oldest first.
    pub migrations: Vec<MigrationRecord>,
}

/// Implementation of the cache_stats tool.
pub async fn stats_impl(cache: &ResponseCache) -> Result<CallToolResult, McpError> {
    let stats = cache.db().response_stats().await?;
    let migrations = cache.db().applied_migrations().await?;
    json_result(&CacheStatsOutput { stats, migrations })
}
