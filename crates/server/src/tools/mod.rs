//! MCP tool implementations.
//!
//! This module contains all tools exposed by the macrofacts server.

pub mod cache;
pub mod nutrition_lookup;

pub use cache::{CachePurgeOutput, CachePurgeParams, purge_impl};
pub use nutrition_lookup::{NutritionLookupOutput, NutritionLookupParams, lookup_impl};

use crate::error::ToolError;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// Wrap a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, ToolError> {
    let json = serde_json::to_string_pretty(output)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) fn parse_output<T: serde::de::DeserializeOwned>(result: &CallToolResult) -> T {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    let text = content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
