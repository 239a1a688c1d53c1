//! Ordered, cache-aware resolution across providers.
//!
//! Resolution flow for one call:
//! 1. Normalize the query and restaurant; an empty query stops here
//! 2. Order providers (restaurant queries move the restaurant-aware
//!    provider to the front)
//! 3. Per provider: live cache entry wins, otherwise ask the provider and
//!    cache a usable answer
//! 4. First answer wins; exhausting the list yields `None`
//!
//! Misses are never cached, so a source that starts knowing a food is asked
//! again on the next call.

use crate::providers::{
    CatalogProvider, HttpConfig, NutritionProvider, NutritionixConfig, NutritionixProvider, OpenFoodFactsConfig,
    OpenFoodFactsProvider, ProviderError, UsdaConfig, UsdaProvider, catalog, nutritionix, openfoodfacts, usda,
};
use macrofacts_core::{AppConfig, CatalogDb, NutritionCache, NutritionQuery, NutritionResult};
use std::sync::Arc;

/// Which providers exist, in resolution order.
///
/// A `None` slot means the provider is not configured and is skipped
/// entirely, never attempted.
#[derive(Debug, Clone, Default)]
pub struct ProvidersConfig {
    pub catalog: Option<CatalogDb>,
    pub usda: Option<UsdaConfig>,
    pub openfoodfacts: Option<OpenFoodFactsConfig>,
    pub nutritionix: Option<NutritionixConfig>,
}

impl ProvidersConfig {
    /// Derive the provider set from loaded configuration.
    ///
    /// Missing credentials omit the provider. Timeout, user agent and base
    /// URL overrides are applied to every remote provider that remains.
    pub fn from_app_config(config: &AppConfig, catalog: Option<CatalogDb>) -> Self {
        let usda = config.usda_credentials().map(|key| {
            let mut usda = UsdaConfig::new(key);
            apply_overrides(&mut usda.http, config, config.usda_base_url.as_deref());
            usda
        });

        let openfoodfacts = config.openfoodfacts_enabled.then(|| {
            let mut off = OpenFoodFactsConfig::default();
            apply_overrides(&mut off.http, config, config.openfoodfacts_base_url.as_deref());
            off
        });

        let nutritionix = config.nutritionix_credentials().map(|(id, key)| {
            let mut nix = NutritionixConfig::new(id, key);
            apply_overrides(&mut nix.http, config, config.nutritionix_base_url.as_deref());
            nix
        });

        Self { catalog, usda, openfoodfacts, nutritionix }
    }
}

fn apply_overrides(http: &mut HttpConfig, config: &AppConfig, base_url: Option<&str>) {
    if let Some(timeout) = config.timeout() {
        http.timeout = timeout;
    }
    if let Some(base) = base_url {
        http.base_url = base.to_string();
    }
    http.user_agent.clone_from(&config.user_agent);
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub result: NutritionResult,
    /// True when the answer came from the cache rather than a live lookup.
    pub cache_hit: bool,
}

/// Provider chain in front of a shared cache.
///
/// Holds no mutable state; share it behind `Arc`.
#[derive(Clone)]
pub struct Resolver {
    providers: Vec<Arc<dyn NutritionProvider>>,
    cache: Arc<dyn NutritionCache>,
    ttl_days: i64,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("sources", &self.sources())
            .field("ttl_days", &self.ttl_days)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Build a resolver over an explicit provider list, in priority order.
    pub fn new(providers: Vec<Arc<dyn NutritionProvider>>, cache: Arc<dyn NutritionCache>, ttl_days: i64) -> Self {
        Self { providers, cache, ttl_days }
    }

    /// Build the provider chain from configuration.
    ///
    /// Order: catalog, USDA, Open Food Facts, Nutritionix.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if a configured provider cannot be built.
    pub fn from_config(
        config: ProvidersConfig, cache: Arc<dyn NutritionCache>, ttl_days: i64,
    ) -> Result<Self, ProviderError> {
        let mut providers: Vec<Arc<dyn NutritionProvider>> = Vec::new();

        if let Some(catalog) = config.catalog {
            providers.push(Arc::new(CatalogProvider::new(catalog)));
        }
        if let Some(usda) = config.usda {
            providers.push(Arc::new(UsdaProvider::new(usda)?));
        }
        if let Some(off) = config.openfoodfacts {
            providers.push(Arc::new(OpenFoodFactsProvider::new(off)?));
        }
        if let Some(nix) = config.nutritionix {
            providers.push(Arc::new(NutritionixProvider::new(nix)?));
        }

        tracing::info!(
            sources = ?providers.iter().map(|p| p.source()).collect::<Vec<_>>(),
            ttl_days,
            "nutrition providers configured"
        );

        Ok(Self::new(providers, cache, ttl_days))
    }

    /// Configured providers in configuration order.
    pub fn providers(&self) -> &[Arc<dyn NutritionProvider>] {
        &self.providers
    }

    /// Source identifiers in configuration order.
    pub fn sources(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Resolve a food description to macros.
    pub async fn resolve(&self, query: &str, restaurant: Option<&str>) -> Option<NutritionResult> {
        self.resolve_detailed(query, restaurant).await.map(|r| r.result)
    }

    /// Resolve, also reporting whether the answer came from the cache.
    pub async fn resolve_detailed(&self, query: &str, restaurant: Option<&str>) -> Option<Resolution> {
        let query = NutritionQuery::new(query, restaurant);
        if query.is_empty() {
            return None;
        }

        let text = query.normalized_text.as_str();
        let restaurant = query.restaurant();

        for provider in self.ordered(restaurant.is_some()) {
            let source = provider.source();
            if source.is_empty() {
                continue;
            }

            match self.cache.get_cached(text, restaurant, source).await {
                Ok(Some(cached)) => {
                    tracing::debug!(query = text, source, "cache hit");
                    return Some(Resolution { result: cached.result, cache_hit: true });
                }
                Ok(None) => tracing::debug!(query = text, source, "cache miss"),
                Err(e) => tracing::warn!(query = text, source, error = %e, "cache read failed, treating as miss"),
            }

            let Some(result) = provider.lookup(text, restaurant).await else {
                continue;
            };

            if let Err(e) = self
                .cache
                .upsert_cached(text, restaurant, source, &result, self.ttl_days)
                .await
            {
                tracing::warn!(query = text, source, error = %e, "cache write failed");
            }

            return Some(Resolution { result, cache_hit: false });
        }

        tracing::debug!(query = text, restaurant, "no provider resolved query");
        None
    }

    /// Providers in attempt order for one call.
    fn ordered(&self, has_restaurant: bool) -> Vec<&Arc<dyn NutritionProvider>> {
        let mut ordered: Vec<_> = self.providers.iter().collect();
        if has_restaurant && let Some(pos) = ordered.iter().position(|p| p.prefers_restaurant_queries()) {
            let preferred = ordered.remove(pos);
            ordered.insert(0, preferred);
        }
        ordered
    }
}

/// Source identifiers for every provider this crate can build.
pub const KNOWN_SOURCES: [&str; 4] =
    [catalog::SOURCE, usda::SOURCE, openfoodfacts::SOURCE, nutritionix::SOURCE];
