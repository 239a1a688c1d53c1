//! Nutrition data providers.
//!
//! Every provider wraps one data source behind [`NutritionProvider`]:
//!
//! | Provider | Source id | Confidence | Basis |
//! |---|---|---|---|
//! | [`CatalogProvider`] (local catalog) | `usda_db` | 0.7 | serving |
//! | [`UsdaProvider`] (FoodData Central search) | `usda_fdc` | 0.6 | serving |
//! | [`OpenFoodFactsProvider`] | `openfoodfacts` | 0.45 | 100g |
//! | [`NutritionixProvider`] (natural language) | `nutritionix` | 0.7 | serving |
//!
//! Each provider has a fallible fetch step returning
//! `Result<Option<NutritionResult>, ProviderError>`; `lookup` collapses
//! errors and macro-less records into `None`.

pub mod catalog;
pub mod error;
pub mod http;
pub mod nutritionix;
pub mod openfoodfacts;
pub mod usda;

pub use catalog::CatalogProvider;
pub use error::ProviderError;
pub use http::HttpConfig;
pub use nutritionix::{NutritionixConfig, NutritionixProvider};
pub use openfoodfacts::{OpenFoodFactsConfig, OpenFoodFactsProvider};
pub use usda::{UsdaConfig, UsdaProvider};

use async_trait::async_trait;
use macrofacts_core::NutritionResult;

/// One external nutrition data source.
#[async_trait]
pub trait NutritionProvider: Send + Sync {
    /// Stable identifier stored with every result and cache entry.
    fn source(&self) -> &str;

    /// Look up an already-normalized query.
    ///
    /// Never fails: transport errors, malformed payloads and records without
    /// macros all come back as `None`.
    async fn lookup(&self, query: &str, restaurant: Option<&str>) -> Option<NutritionResult>;

    /// Whether restaurant-qualified queries should try this provider first.
    fn prefers_restaurant_queries(&self) -> bool {
        false
    }
}

/// Collapse a fetch outcome into the provider boundary contract.
pub(crate) fn settle(
    source: &str, query: &str, outcome: Result<Option<NutritionResult>, ProviderError>,
) -> Option<NutritionResult> {
    match outcome {
        Ok(Some(result)) => {
            let usable = result.into_usable();
            if usable.is_none() {
                tracing::debug!(source, query, "match carried no macros");
            }
            usable
        }
        Ok(None) => {
            tracing::debug!(source, query, "no match");
            None
        }
        Err(e) => {
            tracing::warn!(source, query, error = %e, "provider lookup failed");
            None
        }
    }
}
