//! Local food catalog backing the internal nutrition provider.
//!
//! A read-mostly SQLite database with one row per food in `foods`, joined by
//! numeric id to per-serving macros (`food_macros`) and serving weights
//! (`food_servings`). Rows are written only when seeding.

use crate::Error;
use crate::cache::connection::{open_in_memory_with_migrations, open_with_migrations};
use crate::cache::migrations::CATALOG_MIGRATIONS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio_rusqlite::{Connection, params, rusqlite};

/// A search hit from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodCandidate {
    pub fdc_id: i64,
    pub description: String,
}

/// Macro facts for one food, per serving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodMacros {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

/// Serving facts for one food.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodServing {
    pub serving_weight_grams: Option<f64>,
    pub serving_description: Option<String>,
}

/// A complete catalog row set, used for seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub fdc_id: i64,
    pub description: String,
    pub macros: FoodMacros,
    #[serde(default)]
    pub serving: Option<FoodServing>,
}

/// Food catalog handle.
#[derive(Clone, Debug)]
pub struct CatalogDb {
    conn: Connection,
}

/// Escape LIKE wildcards so the query matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}

impl CatalogDb {
    /// Open a catalog at the specified path, creating the schema if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = open_with_migrations(path, CATALOG_MIGRATIONS).await?;
        Ok(Self { conn })
    }

    /// Open an empty in-memory catalog for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = open_in_memory_with_migrations(CATALOG_MIGRATIONS).await?;
        Ok(Self { conn })
    }

    /// Find foods whose description contains `query`, ignoring case.
    ///
    /// Matching runs against a Unicode-lowercased copy of each description.
    /// Returns at most `limit` candidates, shortest description first and
    /// ties by id, so the limit never drops a more specific match.
    pub async fn search_by_description(&self, query: &str, limit: usize) -> Result<Vec<FoodCandidate>, Error> {
        let pattern = like_pattern(&query.to_lowercase());
        let limit = limit as i64;
        self.conn
            .call(move |conn| -> Result<Vec<FoodCandidate>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT fdc_id, description FROM foods
                    WHERE description_folded LIKE ?1 ESCAPE '\\'
                    ORDER BY length(description), fdc_id LIMIT ?2",
                )?;
                let rows = stmt
                    .query_map(params![pattern, limit], |row| {
                        Ok(FoodCandidate { fdc_id: row.get(0)?, description: row.get(1)? })
                    })?
                    .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                Ok(rows)
            })
            .await
            .map_err(Error::from)
    }

    /// Macro facts for a food id, if the catalog has them.
    pub async fn get_macros(&self, fdc_id: i64) -> Result<Option<FoodMacros>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<FoodMacros>, Error> {
                let result = conn.query_row(
                    "SELECT calories, protein_g, carbs_g, fat_g FROM food_macros WHERE fdc_id = ?1",
                    params![fdc_id],
                    |row| {
                        Ok(FoodMacros {
                            calories: row.get(0)?,
                            protein_g: row.get(1)?,
                            carbs_g: row.get(2)?,
                            fat_g: row.get(3)?,
                        })
                    },
                );
                match result {
                    Ok(m) => Ok(Some(m)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Serving facts for a food id, if the catalog has them.
    pub async fn get_serving(&self, fdc_id: i64) -> Result<Option<FoodServing>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<FoodServing>, Error> {
                let result = conn.query_row(
                    "SELECT serving_weight_grams, serving_description FROM food_servings WHERE fdc_id = ?1",
                    params![fdc_id],
                    |row| Ok(FoodServing { serving_weight_grams: row.get(0)?, serving_description: row.get(1)? }),
                );
                match result {
                    Ok(s) => Ok(Some(s)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace a food with its macro and serving rows.
    pub async fn insert_food(&self, record: &FoodRecord) -> Result<(), Error> {
        if record.description.trim().is_empty() {
            return Err(Error::InvalidInput("food description cannot be empty".into()));
        }

        let record = record.clone();
        let folded = record.description.to_lowercase();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO foods (fdc_id, description, description_folded) VALUES (?1, ?2, ?3)
                    ON CONFLICT(fdc_id) DO UPDATE SET
                        description = excluded.description,
                        description_folded = excluded.description_folded",
                    params![record.fdc_id, record.description, folded],
                )?;
                tx.execute(
                    "INSERT INTO food_macros (fdc_id, calories, protein_g, carbs_g, fat_g)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(fdc_id) DO UPDATE SET
                        calories = excluded.calories,
                        protein_g = excluded.protein_g,
                        carbs_g = excluded.carbs_g,
                        fat_g = excluded.fat_g",
                    params![
                        record.fdc_id,
                        record.macros.calories,
                        record.macros.protein_g,
                        record.macros.carbs_g,
                        record.macros.fat_g,
                    ],
                )?;
                match &record.serving {
                    Some(serving) => {
                        tx.execute(
                            "INSERT INTO food_servings (fdc_id, serving_weight_grams, serving_description)
                            VALUES (?1, ?2, ?3)
                            ON CONFLICT(fdc_id) DO UPDATE SET
                                serving_weight_grams = excluded.serving_weight_grams,
                                serving_description = excluded.serving_description",
                            params![record.fdc_id, serving.serving_weight_grams, serving.serving_description],
                        )?;
                    }
                    None => {
                        tx.execute("DELETE FROM food_servings WHERE fdc_id = ?1", params![record.fdc_id])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Number of foods in the catalog.
    pub async fn food_count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM foods", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fdc_id: i64, description: &str, calories: f64, grams: Option<f64>) -> FoodRecord {
        FoodRecord {
            fdc_id,
            description: description.to_string(),
            macros: FoodMacros {
                calories: Some(calories),
                protein_g: Some(10.0),
                carbs_g: Some(20.0),
                fat_g: Some(5.0),
            },
            serving: grams.map(|g| FoodServing {
                serving_weight_grams: Some(g),
                serving_description: Some("1 serving".to_string()),
            }),
        }
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = CatalogDb::open_in_memory().await.unwrap();
        db.insert_food(&record(1, "Cheeseburger, double patty", 800.0, None))
            .await
            .unwrap();
        db.insert_food(&record(2, "Hamburger", 500.0, None)).await.unwrap();

        let hits = db.search_by_description("cheeseburger", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fdc_id, 1);

        let hits = db.search_by_description("BURGER", 10).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let db = CatalogDb::open_in_memory().await.unwrap();
        db.insert_food(&record(1, "Éclair, chocolate", 260.0, None)).await.unwrap();

        let hits = db.search_by_description("éclair", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "Éclair, chocolate");

        let hits = db.search_by_description("ÉCLAIR", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_search_limit_keeps_shortest_descriptions() {
        let db = CatalogDb::open_in_memory().await.unwrap();
        for id in 1..=10 {
            db.insert_food(&record(id, &format!("Cheeseburger, variant number {id}"), 900.0, None))
                .await
                .unwrap();
        }
        db.insert_food(&record(500, "Cheeseburger", 550.0, None)).await.unwrap();

        let hits = db.search_by_description("cheeseburger", 10).await.unwrap();
        assert_eq!(hits.len(), 10);
        assert_eq!(hits[0].fdc_id, 500);
        assert_eq!(hits[1].fdc_id, 1);
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let db = CatalogDb::open_in_memory().await.unwrap();
        for id in 1..=5 {
            db.insert_food(&record(id, &format!("Rice variant {id}"), 200.0, None))
                .await
                .unwrap();
        }
        let hits = db.search_by_description("rice", 3).await.unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let db = CatalogDb::open_in_memory().await.unwrap();
        db.insert_food(&record(1, "Milk 2% fat", 120.0, None)).await.unwrap();
        db.insert_food(&record(2, "Milk 20 fat", 150.0, None)).await.unwrap();

        let hits = db.search_by_description("2%", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fdc_id, 1);

        let hits = db.search_by_description("_", 10).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_get_macros_and_serving() {
        let db = CatalogDb::open_in_memory().await.unwrap();
        db.insert_food(&record(7, "Cheeseburger", 550.0, Some(221.0)))
            .await
            .unwrap();

        let macros = db.get_macros(7).await.unwrap().unwrap();
        assert_eq!(macros.calories, Some(550.0));

        let serving = db.get_serving(7).await.unwrap().unwrap();
        assert_eq!(serving.serving_weight_grams, Some(221.0));

        assert!(db.get_macros(8).await.unwrap().is_none());
        assert!(db.get_serving(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces_rows() {
        let db = CatalogDb::open_in_memory().await.unwrap();
        db.insert_food(&record(7, "Cheeseburger", 550.0, Some(221.0)))
            .await
            .unwrap();
        db.insert_food(&record(7, "Cheeseburger, regular", 600.0, None))
            .await
            .unwrap();

        assert_eq!(db.food_count().await.unwrap(), 1);
        assert_eq!(db.get_macros(7).await.unwrap().unwrap().calories, Some(600.0));
        assert!(db.get_serving(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_description() {
        let db = CatalogDb::open_in_memory().await.unwrap();
        let err = db.insert_food(&record(1, "  ", 10.0, None)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
