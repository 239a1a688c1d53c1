//! Provider backed by the local food catalog.
//!
//! Searches descriptions by substring, prefers the shortest matching
//! description as the most specific food, then joins macro and serving facts
//! by food id.

use super::{NutritionProvider, ProviderError, settle};
use async_trait::async_trait;
use macrofacts_core::{Basis, CatalogDb, FoodCandidate, NutritionResult};

/// Source identifier for catalog results.
pub const SOURCE: &str = "usda_db";

/// Fixed trust in the local catalog.
pub const CONFIDENCE: f64 = 0.7;

/// Candidates fetched before re-ranking.
const CANDIDATE_LIMIT: usize = 10;

/// Local catalog provider.
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    catalog: CatalogDb,
}

impl CatalogProvider {
    pub fn new(catalog: CatalogDb) -> Self {
        Self { catalog }
    }

    /// Shortest description first; ties keep the lower id. The catalog
    /// already returns candidates in this order.
    fn best_candidate(mut candidates: Vec<FoodCandidate>) -> Option<FoodCandidate> {
        candidates.sort_by_key(|c| (c.description.chars().count(), c.fdc_id));
        candidates.into_iter().next()
    }

    async fn fetch(&self, query: &str) -> Result<Option<NutritionResult>, ProviderError> {
        if query.is_empty() {
            return Ok(None);
        }

        let candidates = self.catalog.search_by_description(query, CANDIDATE_LIMIT).await?;
        let Some(food) = Self::best_candidate(candidates) else {
            return Ok(None);
        };

        let Some(macros) = self.catalog.get_macros(food.fdc_id).await? else {
            return Ok(None);
        };
        let serving = self.catalog.get_serving(food.fdc_id).await?;

        let mut raw = serde_json::json!({ "fdc_id": food.fdc_id });
        if let Some(desc) = serving.as_ref().and_then(|s| s.serving_description.as_deref()) {
            raw["serving_description"] = desc.into();
        }

        Ok(Some(
            NutritionResult::new(SOURCE, CONFIDENCE, Basis::Serving)
                .with_macros(macros.calories, macros.protein_g, macros.carbs_g, macros.fat_g)
                .with_serving_weight(serving.and_then(|s| s.serving_weight_grams))
                .with_resolved_name(Some(food.description))
                .with_raw(raw),
        ))
    }
}

#[async_trait]
impl NutritionProvider for CatalogProvider {
    fn source(&self) -> &str {
        SOURCE
    }

    async fn lookup(&self, query: &str, _restaurant: Option<&str>) -> Option<NutritionResult> {
        settle(SOURCE, query, self.fetch(query).await)
    }
}
