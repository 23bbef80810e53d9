//! HTTP transport.
//!
//! [`Fetcher`] is the seam between the cascade and the network: one GET,
//! returning the raw body or a distinct error. [`HttpFetcher`] implements
//! it with `reqwest`.

use std::future::Future;
use std::time::Duration;

use super::error::ApiError;

/// Default base URL for the MBTA v3 API.
const DEFAULT_BASE_URL: &str = "https://api-v3.mbta.com";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Performs a single asynchronous GET.
///
/// This abstraction allows the cascade to be tested with mock responses.
pub trait Fetcher {
    /// Fetch `url` and return the response body.
    ///
    /// Non-success statuses and transport failures are errors; the body is
    /// not inspected.
    fn get(&self, url: &str) -> impl Future<Output = Result<String, ApiError>>;
}

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for the API, without the resource path
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `reqwest`-backed [`Fetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the configured timeout.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http })
    }
}

impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.api+json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}
