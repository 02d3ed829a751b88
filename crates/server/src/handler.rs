//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::cache::{
    CacheGetParams, CacheInvalidateParams, CachePurgeParams, get_impl, invalidate_impl, purge_impl, stats_impl,
};

use respcache_core::{FreshnessPolicy, ResponseCache};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The admin MCP server for respcache.
#[derive(Clone)]
pub struct AdminServer {
    tool_router: ToolRouter<Self>,
    cache: ResponseCache,
    policy: FreshnessPolicy,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl AdminServer {
    /// Create a new server handler over `cache`, purging with `policy`.
    pub fn new(cache: ResponseCache, policy: FreshnessPolicy) -> Self {
        Self { tool_router: Self::tool_router(), cache, policy }
    }

    #[tool(description = "Get a cached response by its fingerprint key. Returns status, body, headers and insertion time.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.cache, params.0).await
    }

    #[tool(
        description = "Invalidate cached responses by exact key, by key prefix, or by key prefix plus body text. Returns the number deleted."
    )]
    async fn cache_invalidate(&self, params: Parameters<CacheInvalidateParams>) -> Result<CallToolResult, McpError> {
        invalidate_impl(&self.cache, params.0).await
    }

    #[tool(description = "Purge cached responses older than an age, past the server's validity window, or beyond a count.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.cache, &self.policy, params.0).await
    }

    #[tool(description = "Report entry count, insertion time range and applied schema migrations.")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        stats_impl(&self.cache).await
    }
}

impl ServerHandler for AdminServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "respcache-admin".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
