//! macrofacts command-line entry point.
//!
//! Resolves foods and maintains the cache using the same configuration as
//! the MCP server (`MACROFACTS_*` variables and `MACROFACTS_CONFIG_FILE`).
//! Results print as JSON on stdout; logs go to stderr.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use macrofacts_client::{KNOWN_SOURCES, ProvidersConfig, Resolver};
use macrofacts_core::{AppConfig, CacheDb, CatalogDb};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "macrofacts")]
#[command(about = "Resolve food descriptions to calories and macronutrients")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a food description
    Resolve {
        /// Food description, e.g. "greek yogurt"
        query: String,

        /// Restaurant or brand the food came from
        #[arg(short, long)]
        restaurant: Option<String>,
    },

    /// Delete cache entries
    Purge {
        /// Delete entries whose TTL has passed
        #[arg(long)]
        expired: bool,

        /// Delete every entry from this source
        #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(KNOWN_SOURCES))]
        source: Option<String>,
    },

    /// List configured providers in resolution order
    Sources,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let cache = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache at {}", config.db_path.display()))?;

    match cli.command {
        Command::Resolve { query, restaurant } => {
            let resolver = build_resolver(&config, cache).await?;
            let resolution = resolver.resolve_detailed(&query, restaurant.as_deref()).await;
            match &resolution {
                Some(r) => tracing::info!(source = %r.result.source, cache_hit = r.cache_hit, "resolved"),
                None => tracing::info!(query = %query, "no provider resolved query"),
            }
            let output = serde_json::json!({
                "found": resolution.is_some(),
                "cache_hit": resolution.as_ref().is_some_and(|r| r.cache_hit),
                "result": resolution.map(|r| r.result),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Purge { expired, source } => {
            let (deleted, remaining) = purge(&cache, expired, source.as_deref()).await?;
            println!("{}", serde_json::json!({ "deleted": deleted, "remaining": remaining }));
        }
        Command::Sources => {
            let resolver = build_resolver(&config, cache).await?;
            tracing::debug!(count = resolver.providers().len(), "listing configured providers");
            for source in resolver.sources() {
                println!("{source}");
            }
        }
    }

    Ok(())
}

/// Apply the requested purges and report (deleted, remaining).
async fn purge(cache: &CacheDb, expired: bool, source: Option<&str>) -> Result<(u64, u64)> {
    if !expired && source.is_none() {
        bail!("nothing to purge: pass --expired and/or --source");
    }
    let mut deleted = 0;
    if expired {
        deleted += cache.purge_expired_nutrition().await?;
    }
    if let Some(source) = source {
        deleted += cache.purge_nutrition_by_source(source).await?;
    }
    let remaining = cache.nutrition_entry_count().await?;
    tracing::info!(deleted, remaining, "cache purged");
    Ok((deleted, remaining))
}

async fn build_resolver(config: &AppConfig, cache: CacheDb) -> Result<Resolver> {
    let catalog = match &config.catalog_path {
        Some(path) => Some(
            CatalogDb::open(path)
                .await
                .with_context(|| format!("opening catalog at {}", path.display()))?,
        ),
        None => None,
    };
    let providers = ProvidersConfig::from_app_config(config, catalog);
    Ok(Resolver::from_config(providers, Arc::new(cache), config.cache_ttl_days)?)
}
