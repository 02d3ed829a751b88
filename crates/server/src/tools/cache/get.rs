//! cache_get tool implementation.
//!
//! Retrieves a cached response by key.

use respcache_core::{CachedResponse, Error, ResponseCache};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// The fingerprint key of the cached response to retrieve.
    pub key: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    /// The cached response.
    pub entry: CachedResponse,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(cache: &ResponseCache, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let entry = cache
        .get(&params.key)
        .await?
        .ok_or_else(|| Error::CacheMiss(params.key.clone()))?;

    json_result(&CacheGetOutput { entry })
}
