//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MACROFACTS_*)
//! 2. TOML config file (if MACROFACTS_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! Provider credentials are read here once; which providers exist is decided
//! from this struct at startup and never re-read.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MACROFACTS_*)
/// 2. TOML config file (if MACROFACTS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite nutrition cache.
    ///
    /// Set via MACROFACTS_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Path to the local food catalog. Without it the catalog provider is
    /// not configured.
    ///
    /// Set via MACROFACTS_CATALOG_PATH environment variable.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// USDA FoodData Central API key.
    ///
    /// Set via MACROFACTS_USDA_API_KEY environment variable.
    #[serde(default)]
    pub usda_api_key: Option<String>,

    /// Nutritionix application id (needs `nutritionix_app_key` too).
    ///
    /// Set via MACROFACTS_NUTRITIONIX_APP_ID environment variable.
    #[serde(default)]
    pub nutritionix_app_id: Option<String>,

    /// Nutritionix application key (needs `nutritionix_app_id` too).
    ///
    /// Set via MACROFACTS_NUTRITIONIX_APP_KEY environment variable.
    #[serde(default)]
    pub nutritionix_app_key: Option<String>,

    /// Whether the Open Food Facts provider is configured. It needs no key.
    ///
    /// Set via MACROFACTS_OPENFOODFACTS_ENABLED environment variable.
    #[serde(default = "default_true")]
    pub openfoodfacts_enabled: bool,

    /// Days a cached result stays live.
    ///
    /// Set via MACROFACTS_CACHE_TTL_DAYS environment variable.
    #[serde(default = "default_cache_ttl_days")]
    pub cache_ttl_days: i64,

    /// HTTP timeout applied to every provider, in milliseconds. Providers
    /// keep their own defaults when unset.
    ///
    /// Set via MACROFACTS_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via MACROFACTS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL override for the USDA API.
    #[serde(default)]
    pub usda_base_url: Option<String>,

    /// Base URL override for Open Food Facts.
    #[serde(default)]
    pub openfoodfacts_base_url: Option<String>,

    /// Base URL override for Nutritionix.
    #[serde(default)]
    pub nutritionix_base_url: Option<String>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./macrofacts-cache.sqlite")
}

fn default_user_agent() -> String {
    "macrofacts/0.1".into()
}

fn default_cache_ttl_days() -> i64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            catalog_path: None,
            usda_api_key: None,
            nutritionix_app_id: None,
            nutritionix_app_key: None,
            openfoodfacts_enabled: true,
            cache_ttl_days: default_cache_ttl_days(),
            timeout_ms: None,
            user_agent: default_user_agent(),
            usda_base_url: None,
            openfoodfacts_base_url: None,
            nutritionix_base_url: None,
        }
    }
}

impl AppConfig {
    /// Provider timeout override as Duration, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MACROFACTS_`
    /// 2. TOML file from `MACROFACTS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MACROFACTS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        Self::extract(figment.merge(
            Env::prefixed("MACROFACTS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        ))
    }

    /// Extract and validate a configuration from an assembled figment.
    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// USDA API key, if the provider is configured.
    pub fn usda_credentials(&self) -> Option<&str> {
        self.usda_api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Nutritionix (app id, app key), only when both are set.
    pub fn nutritionix_credentials(&self) -> Option<(&str, &str)> {
        let id = self.nutritionix_app_id.as_deref().filter(|v| !v.trim().is_empty())?;
        let key = self.nutritionix_app_key.as_deref().filter(|v| !v.trim().is_empty())?;
        Some((id, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./macrofacts-cache.sqlite"));
        assert_eq!(config.user_agent, "macrofacts/0.1");
        assert_eq!(config.cache_ttl_days, 30);
        assert!(config.openfoodfacts_enabled);
        assert!(config.catalog_path.is_none());
        assert!(config.usda_api_key.is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig { timeout_ms: Some(8_000), ..Default::default() };
        assert_eq!(config.timeout(), Some(Duration::from_millis(8_000)));
    }

    #[test]
    fn test_usda_credentials() {
        assert!(AppConfig::default().usda_credentials().is_none());

        let blank = AppConfig { usda_api_key: Some("  ".into()), ..Default::default() };
        assert!(blank.usda_credentials().is_none());

        let config = AppConfig { usda_api_key: Some("test-key".into()), ..Default::default() };
        assert_eq!(config.usda_credentials(), Some("test-key"));
    }

    #[test]
    fn test_nutritionix_needs_both_credentials() {
        let only_id = AppConfig { nutritionix_app_id: Some("id".into()), ..Default::default() };
        assert!(only_id.nutritionix_credentials().is_none());

        let both = AppConfig {
            nutritionix_app_id: Some("id".into()),
            nutritionix_app_key: Some("key".into()),
            ..Default::default()
        };
        assert_eq!(both.nutritionix_credentials(), Some(("id", "key")));
    }

    #[test]
    fn test_extract_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cache_ttl_days = 7\nusda_api_key = \"abc\"\nopenfoodfacts_enabled = false").unwrap();

        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::file(file.path()));
        let config = AppConfig::extract(figment).unwrap();
        assert_eq!(config.cache_ttl_days, 7);
        assert_eq!(config.usda_credentials(), Some("abc"));
        assert!(!config.openfoodfacts_enabled);
    }

    #[test]
    fn test_extract_rejects_invalid_values() {
        let figment =
            Figment::from(Serialized::defaults(AppConfig::default())).merge(Serialized::default("cache_ttl_days", 0));
        let result = AppConfig::extract(figment);
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_ttl_days"));
    }
}
