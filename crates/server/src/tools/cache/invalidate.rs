//! cache_invalidate tool implementation.
//!
//! Removes entries by exact key, by key prefix, or by key prefix and body
//! content.

use respcache_core::{Error, ResponseCache};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_invalidate tool.
///
/// Exactly one of `key` or `prefix` must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateParams {
    /// Remove the entry with this exact key.
    pub key: Option<String>,

    /// Remove every entry whose key starts with this prefix.
    pub prefix: Option<String>,

    /// With `prefix`, only remove entries whose body contains this text.
    pub body_contains: Option<String>,
}

/// Output from the cache_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_invalidate tool.
pub async fn invalidate_impl(
    cache: &ResponseCache, params: CacheInvalidateParams,
) -> Result<CallToolResult, McpError> {
    if params.prefix.as_deref() == Some("") {
        return Err(Error::InvalidInput("prefix must not be empty".to_string()).into());
    }

    let deleted = match (params.key, params.prefix, params.body_contains) {
        (Some(key), None, None) => u64::from(cache.invalidate(&key).await?),
        (None, Some(prefix), None) => cache.invalidate_prefix(&prefix).await?,
        (None, Some(prefix), Some(needle)) => cache.invalidate_mentions(&prefix, &needle).await?,
        (Some(_), _, Some(_)) | (None, None, Some(_)) => {
            return Err(Error::InvalidInput("body_contains requires prefix".to_string()).into());
        }
        _ => {
            return Err(Error::InvalidInput("Exactly one of key or prefix must be specified".to_string()).into());
        }
    };

    json_result(&CacheInvalidateOutput { deleted })
}
