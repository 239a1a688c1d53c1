//! USDA FoodData Central search provider.
//!
//! - **Endpoint**: `POST {base}/foods/search?api_key=KEY`
//! - **Body**: `{"query": "...", "pageSize": 1}`
//! - **Selection**: first returned food
//! - **Macros**: nutrient rows matched by name synonym (energy, protein,
//!   carbohydrate, total lipid/fat); kJ energy rows are ignored
//! - **Serving**: `servingSize` when reported in grams

pub mod response;

pub use response::{UsdaFood, UsdaMacros, UsdaSearchResponse};

use super::http::{HttpConfig, read_json};
use super::{NutritionProvider, ProviderError, settle};
use async_trait::async_trait;
use macrofacts_core::{Basis, NutritionResult};
use serde::Serialize;
use std::time::Duration;

/// Source identifier for USDA search results.
pub const SOURCE: &str = "usda_fdc";

/// Fixed trust in USDA search matches.
pub const CONFIDENCE: f64 = 0.6;

/// Default base URL for the FoodData Central API.
pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// USDA provider configuration.
#[derive(Debug, Clone)]
pub struct UsdaConfig {
    /// API key (free from https://fdc.nal.usda.gov/api-key-signup.html).
    pub api_key: String,
    pub http: HttpConfig,
}

impl UsdaConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), http: HttpConfig::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT) }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    query: &'a str,
    page_size: u8,
}

/// USDA FoodData Central search provider.
#[derive(Debug, Clone)]
pub struct UsdaProvider {
    http: reqwest::Client,
    config: UsdaConfig,
}

impl UsdaProvider {
    /// Create a new provider.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` for an empty key, or `Network` if the
    /// HTTP client cannot be built.
    pub fn new(config: UsdaConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::MissingCredentials("usda_api_key"));
        }
        let http = config.http.build_client()?;
        Ok(Self { http, config })
    }

    /// Map the first search hit to a result.
    fn to_result(food: UsdaFood) -> NutritionResult {
        let macros = food.macros();
        let raw = serde_json::json!({
            "fdc_id": food.fdc_id,
            "data_type": food.data_type,
            "brand_owner": food.brand_owner,
        });
        NutritionResult::new(SOURCE, CONFIDENCE, Basis::Serving)
            .with_macros(macros.calories, macros.protein_g, macros.carbs_g, macros.fat_g)
            .with_serving_weight(food.serving_weight_grams())
            .with_resolved_name(food.description)
            .with_raw(raw)
    }

    async fn fetch(&self, query: &str) -> Result<Option<NutritionResult>, ProviderError> {
        if query.is_empty() {
            return Ok(None);
        }

        tracing::debug!(query, "searching USDA FoodData Central");

        let response = self
            .http
            .post(self.config.http.url("foods/search"))
            .query(&[("api_key", self.config.api_key.as_str())])
            .json(&SearchBody { query, page_size: 1 })
            .send()
            .await?;

        let body: UsdaSearchResponse = read_json(response).await?;
        Ok(body.foods.into_iter().next().map(Self::to_result))
    }
}

#[async_trait]
impl NutritionProvider for UsdaProvider {
    fn source(&self) -> &str {
        SOURCE
    }

    async fn lookup(&self, query: &str, _restaurant: Option<&str>) -> Option<NutritionResult> {
        settle(SOURCE, query, self.fetch(query).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> UsdaProvider {
        let mut config = UsdaConfig::new("test-key");
        config.http.base_url = server.uri();
        config.http.timeout = Duration::from_millis(500);
        UsdaProvider::new(config).unwrap()
    }

    fn search_body() -> serde_json::Value {
        json!({
            "foods": [{
                "fdcId": 171477,
                "description": "Chicken, breast, meat only, cooked, roasted",
                "dataType": "SR Legacy",
                "foodNutrients": [
                    {"nutrientName": "Protein", "unitName": "G", "value": 31.02},
                    {"nutrientName": "Total lipid (fat)", "unitName": "G", "value": 3.57},
                    {"nutrientName": "Carbohydrate, by difference", "unitName": "G", "value": 0.0},
                    {"nutrientName": "Energy", "unitName": "KCAL", "value": 165.0}
                ]
            }]
        })
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = UsdaProvider::new(UsdaConfig::new("  "));
        assert!(matches!(result, Err(ProviderError::MissingCredentials(_))));
    }

    #[test]
    fn test_default_config() {
        let config = UsdaConfig::new("k");
        assert_eq!(config.http.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.http.timeout, DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/foods/search"))
            .and(query_param("api_key", "test-key"))
            .and(body_json(json!({"query": "chicken breast", "pageSize": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
            .expect(1)
            .mount(&server)
            .await;

        let result = provider_for(&server).lookup("chicken breast", None).await.unwrap();
        assert_eq!(result.source, "usda_fdc");
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.basis, Basis::Serving);
        assert_eq!(result.calories, Some(165.0));
        assert_eq!(result.protein_g, Some(31.02));
        assert_eq!(result.carbs_g, Some(0.0));
        assert_eq!(result.fat_g, Some(3.57));
        assert!(result.serving_weight_grams.is_none());
        assert_eq!(result.raw.unwrap()["fdc_id"], 171477);
    }

    #[tokio::test]
    async fn test_lookup_no_foods() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/foods/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"foods": []})))
            .mount(&server)
            .await;

        assert!(provider_for(&server).lookup("zzz", None).await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_food_without_macros() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/foods/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"foods": [{"fdcId": 1, "description": "Water"}]})),
            )
            .mount(&server)
            .await;

        assert!(provider_for(&server).lookup("water", None).await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_http_errors_are_none() {
        for status in [403, 429, 500] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(status))
                .expect(1)
                .mount(&server)
                .await;

            assert!(provider_for(&server).lookup("apple", None).await.is_none(), "status {status}");
        }
    }

    #[tokio::test]
    async fn test_lookup_malformed_body_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        assert!(provider_for(&server).lookup("apple", None).await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_timeout_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(search_body())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        assert!(provider_for(&server).lookup("chicken", None).await.is_none());
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
            .expect(0)
            .mount(&server)
            .await;

        assert!(provider_for(&server).lookup("", None).await.is_none());
    }
}
