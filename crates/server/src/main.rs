//! macrofacts MCP server entry point.
//!
//! Loads configuration, opens the nutrition cache (and the food catalog when
//! configured), builds the provider chain, then serves MCP on stdio.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::{Context, Result};
use macrofacts_client::{ProvidersConfig, Resolver};
use macrofacts_core::{AppConfig, CacheDb, CatalogDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let cache = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache at {}", config.db_path.display()))?;

    let catalog = match &config.catalog_path {
        Some(path) => Some(
            CatalogDb::open(path)
                .await
                .with_context(|| format!("opening catalog at {}", path.display()))?,
        ),
        None => None,
    };

    let providers = ProvidersConfig::from_app_config(&config, catalog);
    let resolver = Resolver::from_config(providers, Arc::new(cache.clone()), config.cache_ttl_days)?;

    tracing::info!(sources = ?resolver.sources(), "Starting macrofacts server on stdio transport");

    let handler = handler::MacrofactsServer::new(Arc::new(resolver), cache);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
