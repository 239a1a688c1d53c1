//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_ttl_days` is outside 1..=365
    /// - `timeout_ms` is set below 100ms or above 5 minutes
    /// - `user_agent` is empty
    /// - a base URL override is not http(s)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=365).contains(&self.cache_ttl_days) {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_days".into(),
                reason: "must be between 1 and 365".into(),
            });
        }

        if let Some(timeout_ms) = self.timeout_ms {
            if timeout_ms < 100 {
                return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
            }
            if timeout_ms > 300_000 {
                return Err(ConfigError::Invalid {
                    field: "timeout_ms".into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        for (field, url) in [
            ("usda_base_url", &self.usda_base_url),
            ("openfoodfacts_base_url", &self.openfoodfacts_base_url),
            ("nutritionix_base_url", &self.nutritionix_base_url),
        ] {
            if let Some(url) = url
                && !(url.starts_with("http://") || url.starts_with("https://"))
            {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be an http(s) URL".into() });
            }
        }

        if self.nutritionix_app_id.is_some() != self.nutritionix_app_key.is_some() {
            tracing::warn!(
                "only one of nutritionix_app_id and nutritionix_app_key is set; \
                 the Nutritionix provider stays disabled"
            );
        }

        Ok(())
    }
}
