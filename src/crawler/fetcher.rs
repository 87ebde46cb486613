//! HTTP fetcher implementation
//!
//! This module handles every page request the crawler makes:
//! - Building the HTTP client with user agent and timeouts
//! - GET requests to fetch page content
//! - Classifying failures into soft outcomes
//!
//! Failures never surface as `Err`. A 404, any other error status, or a
//! transport failure (DNS, connection, timeout) is logged and reported as a
//! non-success [`FetchOutcome`] so the crawl can carry on. There are no
//! retries.

use crate::config::FetcherConfig;
use crate::url::CanonicalUrl;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered 404
    NotFound,

    /// Server answered with another non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Request never produced a usable response (DNS, connect, timeout, body read)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// Returns `(final_url, body)` on success, `None` on any failure
    ///
    /// `final_url` is where the body was served from after redirects, which
    /// is the base for resolving the page's relative links.
    pub fn into_page(self) -> Option<(String, String)> {
        match self {
            Self::Success {
                final_url, body, ..
            } => Some((final_url, body)),
            _ => None,
        }
    }
}

/// Something that can fetch a page by URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs one GET and classifies the outcome
    async fn fetch(&self, url: &CanonicalUrl) -> FetchOutcome;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use sitesift::config::FetcherConfig;
/// use sitesift::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the result
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 2xx | `Success` |
/// | HTTP 404 | `NotFound` |
/// | Other HTTP status | `HttpError` |
/// | Timeout, connection, DNS, body read | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if status == StatusCode::NOT_FOUND {
                tracing::warn!("404 Error: Page not found for {}", url);
                return FetchOutcome::NotFound;
            }

            if !status.is_success() {
                tracing::warn!("Error fetching {}: HTTP {}", url, status);
                return FetchOutcome::HttpError {
                    status_code: status.as_u16(),
                };
            }

            if final_url != url {
                tracing::debug!("{} redirected to {}", url, final_url);
            }

            match response.text().await {
                Ok(body) => FetchOutcome::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => {
                    tracing::warn!("Error reading body of {}: {}", url, e);
                    FetchOutcome::NetworkError {
                        error: e.to_string(),
                    }
                }
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            tracing::warn!("Error fetching {}: {}", url, error);
            FetchOutcome::NetworkError { error }
        }
    }
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher from configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &CanonicalUrl) -> FetchOutcome {
        fetch_url(&self.client, url.as_str()).await
    }
}
