//! Open Food Facts packaged-product provider.
//!
//! Values are per 100 g, so results carry `Basis::Per100g` with a 100 g
//! weight. Packaged-product matches are the least precise fit for meal
//! descriptions, hence the lowest confidence.

pub mod response;

pub use response::{OffProduct, OffSearchResponse};

use super::http::{HttpConfig, read_json};
use super::{NutritionProvider, ProviderError, settle};
use async_trait::async_trait;
use macrofacts_core::{Basis, NutritionResult};
use std::time::Duration;

/// Source identifier for Open Food Facts results.
pub const SOURCE: &str = "openfoodfacts";

/// Fixed trust in packaged-product matches.
pub const CONFIDENCE: f64 = 0.45;

/// Default base URL.
pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Products requested per search.
const PAGE_SIZE: &str = "5";

/// Open Food Facts provider configuration.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsConfig {
    pub http: HttpConfig,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self { http: HttpConfig::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT) }
    }
}

/// Open Food Facts provider.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsProvider {
    http: reqwest::Client,
    config: OpenFoodFactsConfig,
}

impl OpenFoodFactsProvider {
    /// Create a new provider.
    ///
    /// # Errors
    ///
    /// Returns `Network` if the HTTP client cannot be built.
    pub fn new(config: OpenFoodFactsConfig) -> Result<Self, ProviderError> {
        let http = config.http.build_client()?;
        Ok(Self { http, config })
    }

    fn to_result(product: OffProduct) -> NutritionResult {
        let raw = serde_json::json!({ "code": product.code, "brands": product.brands });
        NutritionResult::new(SOURCE, CONFIDENCE, Basis::Per100g)
            .with_macros(product.calories_100g(), product.protein_100g(), product.carbs_100g(), product.fat_100g())
            .with_serving_weight(Some(100.0))
            .with_resolved_name(product.product_name)
            .with_raw(raw)
    }

    async fn fetch(&self, query: &str) -> Result<Option<NutritionResult>, ProviderError> {
        if query.is_empty() {
            return Ok(None);
        }

        tracing::debug!(query, "searching Open Food Facts");

        let response = self
            .http
            .get(self.config.http.url("cgi/search.pl"))
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", PAGE_SIZE),
            ])
            .send()
            .await?;

        let body: OffSearchResponse = read_json(response).await?;
        Ok(body.pick().map(Self::to_result))
    }
}

#[async_trait]
impl NutritionProvider for OpenFoodFactsProvider {
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
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenFoodFactsProvider {
        let mut config = OpenFoodFactsConfig::default();
        config.http.base_url = server.uri();
        OpenFoodFactsProvider::new(config).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = OpenFoodFactsConfig::default();
        assert_eq!(config.http.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.http.timeout, Duration::from_secs(8));
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi/search.pl"))
            .and(query_param("search_terms", "peanut butter"))
            .and(query_param("json", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [{
                    "code": "0051500255162",
                    "product_name": "Creamy Peanut Butter",
                    "nutriments": {
                        "energy-kcal_100g": 588,
                        "proteins_100g": 25,
                        "carbohydrates_100g": 20,
                        "fat_100g": 50
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = provider_for(&server).lookup("peanut butter", None).await.unwrap();
        assert_eq!(result.source, "openfoodfacts");
        assert_eq!(result.confidence, 0.45);
        assert_eq!(result.basis, Basis::Per100g);
        assert_eq!(result.serving_weight_grams, Some(100.0));
        assert_eq!(result.calories, Some(588.0));
        assert_eq!(result.fat_g, Some(50.0));
        assert_eq!(result.resolved_name.as_deref(), Some("Creamy Peanut Butter"));
    }

    #[tokio::test]
    async fn test_lookup_first_product_without_macros() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"products": [{"product_name": "Mystery", "nutriments": {}}]})),
            )
            .mount(&server)
            .await;

        assert!(provider_for(&server).lookup("mystery", None).await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(provider_for(&server).lookup("bread", None).await.is_none());
    }
}
