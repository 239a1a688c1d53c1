//! Nutritionix natural-language nutrients provider.
//!
//! - **Endpoint**: `POST {base}/v2/natural/nutrients`
//! - **Authentication**: `x-app-id` and `x-app-key` headers
//! - **Restaurant hint**: the query becomes `"<query> from <restaurant>"`
//! - **Selection**: first food item, per serving
//!
//! Menu-style queries match this source better than generic composition
//! databases, so the resolver tries it first when a restaurant is given.

pub mod response;

pub use response::{NutritionixFood, NutritionixResponse};

use super::http::{HttpConfig, read_json};
use super::{NutritionProvider, ProviderError, settle};
use async_trait::async_trait;
use macrofacts_core::{Basis, NutritionResult};
use serde::Serialize;
use std::time::Duration;

/// Source identifier for Nutritionix results.
pub const SOURCE: &str = "nutritionix";

/// Fixed trust in Nutritionix matches.
pub const CONFIDENCE: f64 = 0.7;

/// Default base URL.
pub const DEFAULT_BASE_URL: &str = "https://trackapi.nutritionix.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Nutritionix provider configuration.
#[derive(Debug, Clone)]
pub struct NutritionixConfig {
    pub app_id: String,
    pub app_key: String,
    pub http: HttpConfig,
}

impl NutritionixConfig {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            http: HttpConfig::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT),
        }
    }
}

#[derive(Debug, Serialize)]
struct NaturalQuery {
    query: String,
}

/// Query text sent upstream, with the restaurant as a soft hint.
pub fn natural_query(query: &str, restaurant: Option<&str>) -> String {
    match restaurant {
        Some(r) => format!("{query} from {r}"),
        None => query.to_string(),
    }
}

/// Nutritionix provider.
#[derive(Debug, Clone)]
pub struct NutritionixProvider {
    http: reqwest::Client,
    config: NutritionixConfig,
}

impl NutritionixProvider {
    /// Create a new provider.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` when either credential is empty, or
    /// `Network` if the HTTP client cannot be built.
    pub fn new(config: NutritionixConfig) -> Result<Self, ProviderError> {
        if config.app_id.trim().is_empty() {
            return Err(ProviderError::MissingCredentials("nutritionix_app_id"));
        }
        if config.app_key.trim().is_empty() {
            return Err(ProviderError::MissingCredentials("nutritionix_app_key"));
        }
        let http = config.http.build_client()?;
        Ok(Self { http, config })
    }

    fn to_result(food: NutritionixFood) -> NutritionResult {
        let raw = serde_json::json!({
            "brand_name": food.brand_name,
            "serving_qty": food.serving_qty,
            "serving_unit": food.serving_unit,
        });
        NutritionResult::new(SOURCE, CONFIDENCE, Basis::Serving)
            .with_macros(food.nf_calories, food.nf_protein, food.nf_total_carbohydrate, food.nf_total_fat)
            .with_serving_weight(food.serving_weight_grams)
            .with_resolved_name(food.food_name)
            .with_raw(raw)
    }

    async fn fetch(&self, query: &str, restaurant: Option<&str>) -> Result<Option<NutritionResult>, ProviderError> {
        if query.is_empty() {
            return Ok(None);
        }

        let body = NaturalQuery { query: natural_query(query, restaurant) };
        tracing::debug!(query = %body.query, "querying Nutritionix");

        let response = self
            .http
            .post(self.config.http.url("v2/natural/nutrients"))
            .header("x-app-id", &self.config.app_id)
            .header("x-app-key", &self.config.app_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let body: NutritionixResponse = read_json(response).await?;
        Ok(body.foods.into_iter().next().map(Self::to_result))
    }
}

#[async_trait]
impl NutritionProvider for NutritionixProvider {
    fn source(&self) -> &str {
        SOURCE
    }

    async fn lookup(&self, query: &str, restaurant: Option<&str>) -> Option<NutritionResult> {
        settle(SOURCE, query, self.fetch(query, restaurant).await)
    }

    fn prefers_restaurant_queries(&self) -> bool {
        true
    }
}
