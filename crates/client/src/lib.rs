//! Nutrition providers and the resolver for macrofacts.
//!
//! This crate provides the HTTP and catalog-backed providers plus the
//! cache-aware resolver shared by the server and CLI.

pub mod providers;
pub mod resolver;

pub use providers::{
    CatalogProvider, HttpConfig, NutritionProvider, NutritionixConfig, NutritionixProvider, OpenFoodFactsConfig,
    OpenFoodFactsProvider, ProviderError, UsdaConfig, UsdaProvider,
};
pub use resolver::{KNOWN_SOURCES, ProvidersConfig, Resolution, Resolver};
