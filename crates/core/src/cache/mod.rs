//! SQLite-backed cache for resolved nutrition facts.
//!
//! This module provides a persistent cache using SQLite with async access
//! via tokio-rusqlite. It supports:
//!
//! - Keys on the (query, restaurant, source) triple, hashed with SHA-256
//! - Write-time expiry with reads that skip stale entries
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Purge by expiry or by provider source

pub mod connection;
pub mod hash;
pub mod migrations;
pub mod nutrition;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use nutrition::CachedNutrition;
pub use store::NutritionCache;
