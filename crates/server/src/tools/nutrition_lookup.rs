//! nutrition_lookup tool implementation.
//!
//! Resolves a free-text food description (optionally at a restaurant) to
//! calories and macros through the configured provider chain.

use crate::tools::json_result;
use macrofacts_client::Resolver;
use macrofacts_core::{NutritionQuery, NutritionResult};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for nutrition_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NutritionLookupParams {
    /// Food description, e.g. "chicken burrito bowl".
    pub query: String,

    /// Restaurant or brand the food came from.
    #[serde(default)]
    pub restaurant: Option<String>,
}

/// Output structure for nutrition_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NutritionLookupOutput {
    /// The query after normalization (the cache key form).
    pub query: String,
    /// The restaurant after normalization, if any.
    pub restaurant: Option<String>,
    /// Whether any provider produced usable macros.
    pub found: bool,
    /// Whether the answer was served from the cache.
    pub cache_hit: bool,
    /// The resolved nutrition, when found.
    pub result: Option<NutritionResult>,
}

/// Implementation of the nutrition_lookup tool.
///
/// An unresolvable or empty query is not an error; it reports `found: false`.
pub async fn lookup_impl(resolver: &Resolver, params: NutritionLookupParams) -> Result<CallToolResult, McpError> {
    let normalized = NutritionQuery::new(&params.query, params.restaurant.as_deref());
    let resolution = resolver
        .resolve_detailed(&params.query, params.restaurant.as_deref())
        .await;

    let output = NutritionLookupOutput {
        query: normalized.normalized_text,
        restaurant: normalized.normalized_restaurant,
        found: resolution.is_some(),
        cache_hit: resolution.as_ref().is_some_and(|r| r.cache_hit),
        result: resolution.map(|r| r.result),
    };

    Ok(json_result(&output)?)
}
