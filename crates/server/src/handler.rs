//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::cache::{CacheGetParams, CachePurgeParams, get_impl, purge_impl};
use crate::tools::resolve::{ResolveTitleParams, resolve_impl};
use crate::tools::resolve_batch::{ResolveBatchParams, resolve_batch_impl};

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
use std::sync::Arc;
use unfurl_client::TitleResolver;
use unfurl_core::{AppConfig, CacheDb};

/// The main MCP server handler for mcp-unfurl.
#[derive(Clone)]
pub struct UnfurlServer {
    resolver: Arc<TitleResolver>,
    db: CacheDb,
    config: AppConfig,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl UnfurlServer {
    /// Create a new server handler.
    pub fn new(resolver: Arc<TitleResolver>, db: CacheDb, config: AppConfig) -> Self {
        Self { resolver, db, config, tool_router: Self::tool_router() }
    }

    /// Resolve the title for one URL.
    ///
    /// Walks the cache, provider, and generic HTML paths; a failed
    /// resolution reports an absent title rather than an error.
    #[tool(description = "Resolve the page title for a URL. Returns the title (or null) and whether it was served from cache.")]
    async fn resolve_title(&self, params: Parameters<ResolveTitleParams>) -> Result<CallToolResult, McpError> {
        resolve_impl(&self.resolver, params.0).await
    }

    /// Resolve titles for several URLs under a per-request concurrency bound.
    #[tool(description = "Resolve page titles for multiple URLs concurrently. Per-URL problems are reported per item, not as a batch failure.")]
    async fn resolve_batch(&self, params: Parameters<ResolveBatchParams>) -> Result<CallToolResult, McpError> {
        resolve_batch_impl(self.resolver.clone(), &self.config, params.0).await
    }

    /// Inspect the cached record for a URL.
    #[tool(description = "Look up the cached title record for a URL. Reports a miss marker when nothing is stored.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.db, params.0).await
    }

    /// Manually evict aged cache entries.
    #[tool(description = "Remove cached titles older than a given number of days. Defaults to the configured retention window.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.db, &self.config, params.0).await
    }
}

impl ServerHandler for UnfurlServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-unfurl".into(),
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
