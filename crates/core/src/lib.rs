//! Core types and shared functionality for macrofacts.
//!
//! This crate provides:
//! - The canonical nutrition record and query normalization
//! - Nutrition cache with SQLite backend
//! - Local food catalog
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod normalize;
pub mod nutrition;

pub use cache::{CacheDb, CachedNutrition, NutritionCache};
pub use catalog::{CatalogDb, FoodCandidate, FoodMacros, FoodRecord, FoodServing};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use normalize::{NutritionQuery, normalize_query, normalize_restaurant};
pub use nutrition::{Basis, NutritionResult};
