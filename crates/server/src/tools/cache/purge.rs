//! cache_purge tool implementation.
//!
//! Purges nutrition cache entries that have expired or came from one source.

use crate::error::ToolError;
use crate::tools::json_result;
use macrofacts_client::KNOWN_SOURCES;
use macrofacts_core::CacheDb;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Delete entries whose TTL has passed.
    #[serde(default)]
    pub expired: bool,

    /// Delete every entry produced by this source (e.g. "openfoodfacts").
    #[serde(default)]
    pub source: Option<String>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
    /// Entries left in the cache, live or stale.
    pub remaining: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &CacheDb, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    if !params.expired && params.source.is_none() {
        return Err(ToolError::InvalidInput("At least one of expired or source must be specified".to_string()).into());
    }

    if let Some(source) = &params.source
        && !KNOWN_SOURCES.contains(&source.as_str())
    {
        return Err(ToolError::InvalidInput(format!(
            "Unknown source '{source}', expected one of: {}",
            KNOWN_SOURCES.join(", ")
        ))
        .into());
    }

    let mut deleted_total = 0u64;

    if params.expired {
        deleted_total += cache.purge_expired_nutrition().await?;
    }

    if let Some(source) = &params.source {
        deleted_total += cache.purge_nutrition_by_source(source).await?;
    }

    let remaining = cache.nutrition_entry_count().await?;
    tracing::info!(deleted = deleted_total, remaining, "cache purged");

    Ok(json_result(&CachePurgeOutput { deleted: deleted_total, remaining })?)
}
