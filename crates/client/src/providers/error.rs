//! Provider error types.
//!
//! These never cross the provider boundary: `lookup` turns every one of them
//! into "no result" after logging it.

use std::sync::Arc;

/// Errors from a provider's fetch step.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// A credential the provider needs was empty.
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid credentials")]
    AuthError,

    /// Rate limited by the upstream API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// Non-success HTTP response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The local food catalog failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] macrofacts_core::Error),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ProviderError::Timeout } else { ProviderError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::MissingCredentials("usda_api_key");
        assert!(err.to_string().contains("usda_api_key"));

        let err = ProviderError::HttpError { status: 502 };
        assert_eq!(err.to_string(), "HTTP error: 502");
    }

    #[test]
    fn test_catalog_error_converts() {
        let err: ProviderError = macrofacts_core::Error::CorruptEntry("locked".into()).into();
        assert!(matches!(err, ProviderError::Catalog(_)));
        assert!(err.to_string().contains("locked"));
    }
}
