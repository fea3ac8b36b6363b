//! HTTP fetcher implementation
//!
//! This module handles the single-request transport for the crawler:
//! - Building the shared HTTP client
//! - Issuing one GET with a caller-chosen identity and timeout
//! - Classifying failures into [`FetchError`] variants
//!
//! Retrying is not done here; see [`RetryExecutor`](super::RetryExecutor).

use crate::config::SourceConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// A fetched page body together with the URL it was finally served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Final URL after redirects, used to resolve relative links
    pub url: String,
    pub body: String,
}

impl RawDocument {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }
}

/// One network retrieval
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs a single GET of `url`, sending `identity` as the user agent
    async fn get(
        &self,
        url: &str,
        identity: &str,
        timeout: Duration,
    ) -> Result<RawDocument, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// The user agent is set per request so it can rotate between attempts;
/// only headers that stay fixed for the whole run are installed here.
///
/// # Example
///
/// ```no_run
/// use catalog_sweep::config::SourceConfig;
/// use catalog_sweep::crawler::build_http_client;
///
/// let config = SourceConfig {
///     base_url: "https://deviceatlas.com".to_string(),
///     catalog_path: "/device-data/devices/".to_string(),
///     request_timeout_ms: 10_000,
///     accept_language: "*".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &SourceConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    } else {
        tracing::warn!(
            "Ignoring invalid accept-language value '{}'",
            config.accept_language
        );
    }

    Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from the source configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(
        &self,
        url: &str,
        identity: &str,
        timeout: Duration,
    ) -> Result<RawDocument, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, identity)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(RawDocument {
            url: final_url,
            body,
        })
    }
}

/// Maps a reqwest send error onto a [`FetchError`]
fn classify_error(url: &str, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
