//! Shared HTTP plumbing for the remote providers.

use super::ProviderError;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Default user agent.
pub const DEFAULT_USER_AGENT: &str = "macrofacts/0.1";

/// Connection settings for one remote provider.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self { base_url: base_url.into(), timeout, user_agent: DEFAULT_USER_AGENT.to_string() }
    }

    /// Join `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Build a reqwest client bounded by this config's timeout.
    pub fn build_client(&self) -> Result<reqwest::Client, ProviderError> {
        reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .use_rustls_tls()
            .gzip(true)
            .build()
            .map_err(|e| ProviderError::Network(Arc::new(e)))
    }
}

/// Map the status line, then decode the body as JSON.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ProviderError::AuthError);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }

    if status.is_client_error() || status.is_server_error() {
        return Err(ProviderError::HttpError { status: status.as_u16() });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Read a JSON number, or a string holding one.
///
/// Some sources emit numeric facts as strings; anything non-finite is
/// treated as absent.
pub fn lenient_number(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
