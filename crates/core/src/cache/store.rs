//! Cache store contract consumed by the resolver.

use super::connection::CacheDb;
use super::nutrition::CachedNutrition;
use crate::Error;
use crate::nutrition::NutritionResult;
use async_trait::async_trait;

/// Durable (query, restaurant, source) → result mapping with TTL expiry.
///
/// Implementations enforce expiry themselves: `get_cached` never returns a
/// stale entry. Concurrent writers for one key resolve as last-write-wins.
#[async_trait]
pub trait NutritionCache: Send + Sync {
    /// Look up a live entry for the key triple.
    async fn get_cached(
        &self, query: &str, restaurant: Option<&str>, source: &str,
    ) -> Result<Option<CachedNutrition>, Error>;

    /// Store `result` under the key triple, expiring `ttl_days` from now.
    async fn upsert_cached(
        &self, query: &str, restaurant: Option<&str>, source: &str, result: &NutritionResult, ttl_days: i64,
    ) -> Result<(), Error>;
}

#[async_trait]
impl NutritionCache for CacheDb {
    async fn get_cached(
        &self, query: &str, restaurant: Option<&str>, source: &str,
    ) -> Result<Option<CachedNutrition>, Error> {
        self.get_nutrition(query, restaurant, source).await
    }

    async fn upsert_cached(
        &self, query: &str, restaurant: Option<&str>, source: &str, result: &NutritionResult, ttl_days: i64,
    ) -> Result<(), Error> {
        self.put_nutrition_for_days(query, restaurant, source, result, ttl_days)
            .await
    }
}
