//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{CachePurgeParams, NutritionLookupParams, lookup_impl, purge_impl};

use macrofacts_client::Resolver;
use macrofacts_core::CacheDb;
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

/// The main MCP server handler for macrofacts.
#[derive(Clone)]
pub struct MacrofactsServer {
    resolver: Arc<Resolver>,
    cache: CacheDb,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl MacrofactsServer {
    /// Create a new server handler.
    pub fn new(resolver: Arc<Resolver>, cache: CacheDb) -> Self {
        Self { resolver, cache, tool_router: Self::tool_router() }
    }

    /// Resolve a food description to calories and macronutrients.
    #[tool(
        description = "Look up calories, protein, carbs and fat for a food description, optionally at a restaurant. \
                       Tries the configured nutrition sources in order and caches the first usable answer."
    )]
    async fn nutrition_lookup(&self, params: Parameters<NutritionLookupParams>) -> Result<CallToolResult, McpError> {
        lookup_impl(&self.resolver, params.0).await
    }

    /// Remove expired entries, or every entry from one source.
    #[tool(description = "Purge nutrition cache entries that have expired and/or came from a given source.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.cache, params.0).await
    }
}

impl ServerHandler for MacrofactsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "macrofacts".into(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_router_lists_both_tools() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let resolver = Resolver::new(Vec::new(), Arc::new(cache.clone()), 30);
        let server = MacrofactsServer::new(Arc::new(resolver), cache);

        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["cache_purge", "nutrition_lookup"]);
        assert_eq!(server.get_info().server_info.name, "macrofacts");
    }
}
