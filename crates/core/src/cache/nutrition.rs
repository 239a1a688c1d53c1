//! Nutrition cache operations.
//!
//! Entries are keyed on the (query, restaurant, source) triple and carry an
//! expiry computed at write time. Reads never return an expired entry.

use super::connection::CacheDb;
use super::hash::compute_cache_key;
use crate::nutrition::{Basis, NutritionResult};
use crate::Error;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A live cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedNutrition {
    pub result: NutritionResult,
    pub fetched_at: String,
    pub expires_at: String,
}

/// Fixed-width UTC timestamp so stored values compare correctly as text.
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Raw column values, decoded outside the rusqlite closure.
struct CacheRow {
    source: String,
    calories: Option<f64>,
    protein_g: Option<f64>,
    carbs_g: Option<f64>,
    fat_g: Option<f64>,
    confidence: f64,
    basis: String,
    serving_weight_grams: Option<f64>,
    resolved_name: Option<String>,
    raw_json: Option<String>,
    fetched_at: String,
    expires_at: String,
}

impl TryFrom<CacheRow> for CachedNutrition {
    type Error = Error;

    fn try_from(row: CacheRow) -> Result<Self, Error> {
        let basis = Basis::parse(&row.basis).ok_or_else(|| Error::CorruptEntry(format!("unknown basis {}", row.basis)))?;
        let raw = row
            .raw_json
            .as_deref()
            .map(serde_json::from_str::<serde_json::Value>)
            .transpose()
            .map_err(|e| Error::CorruptEntry(format!("raw payload: {e}")))?;

        Ok(CachedNutrition {
            result: NutritionResult {
                calories: row.calories,
                protein_g: row.protein_g,
                carbs_g: row.carbs_g,
                fat_g: row.fat_g,
                source: row.source,
                confidence: row.confidence,
                basis,
                serving_weight_grams: row.serving_weight_grams,
                resolved_name: row.resolved_name,
                raw,
            },
            fetched_at: row.fetched_at,
            expires_at: row.expires_at,
        })
    }
}

impl CacheDb {
    /// Get a live nutrition entry for the key triple.
    ///
    /// Returns None if the key doesn't exist or the entry has expired.
    pub async fn get_nutrition(
        &self, query: &str, restaurant: Option<&str>, source: &str,
    ) -> Result<Option<CachedNutrition>, Error> {
        let key_hash = compute_cache_key(query, restaurant, source);
        let now = timestamp(Utc::now());

        let row = self
            .conn
            .call(move |conn| -> Result<Option<CacheRow>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT source, calories, protein_g, carbs_g, fat_g, confidence, basis,
                        serving_weight_grams, resolved_name, raw_json, fetched_at, expires_at
                    FROM nutrition_cache WHERE key_hash = ?1 AND expires_at > ?2",
                )?;

                let result = stmt.query_row(params![key_hash, now], |row| {
                    Ok(CacheRow {
                        source: row.get(0)?,
                        calories: row.get(1)?,
                        protein_g: row.get(2)?,
                        carbs_g: row.get(3)?,
                        fat_g: row.get(4)?,
                        confidence: row.get(5)?,
                        basis: row.get(6)?,
                        serving_weight_grams: row.get(7)?,
                        resolved_name: row.get(8)?,
                        raw_json: row.get(9)?,
                        fetched_at: row.get(10)?,
                        expires_at: row.get(11)?,
                    })
                });

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        row.map(CachedNutrition::try_from).transpose()
    }

    /// Insert or update a nutrition entry expiring at `expires_at`.
    ///
    /// Uses UPSERT semantics: last write wins for the key triple.
    pub async fn put_nutrition(
        &self, query: &str, restaurant: Option<&str>, source: &str, result: &NutritionResult,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        if !result.has_macros() {
            return Err(Error::InvalidInput("refusing to cache a result without macros".into()));
        }

        let key_hash = compute_cache_key(query, restaurant, source);
        let query = query.to_string();
        let restaurant = restaurant.map(str::to_string);
        let source = source.to_string();
        let raw_json = result
            .raw
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| Error::InvalidInput(format!("raw payload not serializable: {e}")))?;
        let result = result.clone();
        let fetched_at = timestamp(Utc::now());
        let expires_at = timestamp(expires_at);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO nutrition_cache (
                        key_hash, query, restaurant, source, calories, protein_g, carbs_g, fat_g,
                        confidence, basis, serving_weight_grams, resolved_name, raw_json,
                        fetched_at, expires_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        calories = excluded.calories,
                        protein_g = excluded.protein_g,
                        carbs_g = excluded.carbs_g,
                        fat_g = excluded.fat_g,
                        confidence = excluded.confidence,
                        basis = excluded.basis,
                        serving_weight_grams = excluded.serving_weight_grams,
                        resolved_name = excluded.resolved_name,
                        raw_json = excluded.raw_json,
                        fetched_at = excluded.fetched_at,
                        expires_at = excluded.expires_at",
                    params![
                        key_hash,
                        query,
                        restaurant,
                        source,
                        result.calories,
                        result.protein_g,
                        result.carbs_g,
                        result.fat_g,
                        result.confidence,
                        result.basis.as_str(),
                        result.serving_weight_grams,
                        result.resolved_name,
                        raw_json,
                        fetched_at,
                        expires_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a nutrition entry that lives for `ttl_days`.
    ///
    /// Returns `InvalidInput` when the expiry falls outside the representable
    /// date range.
    pub async fn put_nutrition_for_days(
        &self, query: &str, restaurant: Option<&str>, source: &str, result: &NutritionResult, ttl_days: i64,
    ) -> Result<(), Error> {
        let expires_at = Duration::try_days(ttl_days)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| Error::InvalidInput(format!("cache TTL of {ttl_days} days is out of range")))?;
        self.put_nutrition(query, restaurant, source, result, expires_at)
            .await
    }

    /// Delete expired nutrition entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired_nutrition(&self) -> Result<u64, Error> {
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM nutrition_cache WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry written for one provider source.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_nutrition_by_source(&self, source: &str) -> Result<u64, Error> {
        let source = source.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM nutrition_cache WHERE source = ?1", params![source])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of stored entries, live or expired.
    pub async fn nutrition_entry_count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM nutrition_cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
