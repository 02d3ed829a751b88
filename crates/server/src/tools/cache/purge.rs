//! cache_purge tool implementation.
//!
//! Purges cache entries by age, by expiry under the server's freshness
//! policy, or by count.

use std::time::Duration;

use respcache_core::{Error, FreshnessPolicy, ResponseCache};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Purge entries inserted more than this many seconds ago.
    pub older_than_secs: Option<u64>,

    /// Purge entries the server would no longer serve.
    #[serde(default)]
    pub expired: bool,

    /// Keep only the newest N entries.
    pub max_entries: Option<usize>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(
    cache: &ResponseCache, policy: &FreshnessPolicy, params: CachePurgeParams,
) -> Result<CallToolResult, McpError> {
    if params.older_than_secs.is_none() && !params.expired && params.max_entries.is_none() {
        return Err(Error::InvalidInput(
            "At least one of older_than_secs, expired, or max_entries must be specified".to_string(),
        )
        .into());
    }

    let mut deleted_total = 0u64;

    if let Some(secs) = params.older_than_secs {
        deleted_total += cache.purge_older_than(Duration::from_secs(secs)).await?;
    }

    if params.expired {
        deleted_total += cache.purge_expired(policy).await?;
    }

    if let Some(max_entries) = params.max_entries {
        deleted_total += cache.db().purge_oldest_responses(max_entries).await?;
    }

    json_result(&CachePurgeOutput { deleted: deleted_total })
}
