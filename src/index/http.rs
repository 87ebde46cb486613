//! HTTP client for the hosted index API
//!
//! Endpoints, relative to the configured `api-url`:
//!
//! | Operation | Request | Success |
//! |-----------|---------|---------|
//! | lookup | `GET /v1/knowledge/by-name/{name}` | 200 `{id, name}`, 404 = absent |
//! | create | `POST /v1/knowledge` `{name}` | 2xx `{id, name}` |
//! | upsert | `POST /v1/knowledge/{id}/add` document | 2xx |
//!
//! Every request carries the API key in the `X-OPPER-API-KEY` header.

use crate::config::IndexConfig;
use crate::index::{IndexDocument, IndexError, IndexHandle, SearchIndex};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::time::Duration;
use url::Url;

const API_KEY_HEADER: &str = "X-OPPER-API-KEY";

/// Shown in place of the API key in debug output
const REDACTED: &str = "<redacted>";

/// Index description returned by lookup and create
#[derive(Debug, Clone, Deserialize)]
struct IndexInfo {
    id: String,
    name: String,
}

/// Client for looking up and creating indexes over HTTP
#[derive(Clone)]
pub struct HttpIndexClient {
    client: Client,
    api_url: Url,
    api_key: String,
}

impl HttpIndexClient {
    /// Creates a client for the API described by `config`
    pub fn new(config: &IndexConfig, api_key: &str) -> Result<Self, IndexError> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| IndexError::Decode(format!("Invalid api-url: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url,
            api_key: api_key.to_string(),
        })
    }

    /// Builds an endpoint URL from path segments under the API root
    fn endpoint(&self, segments: &[&str]) -> Result<Url, IndexError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| IndexError::Decode(format!("api-url {} cannot be a base", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn handle_for(&self, info: IndexInfo) -> Result<HttpIndex, IndexError> {
        let add_url = self.endpoint(&["v1", "knowledge", info.id.as_str(), "add"])?;
        Ok(HttpIndex {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            add_url,
            id: info.id,
            name: info.name,
        })
    }
}

#[async_trait]
impl SearchIndex for HttpIndexClient {
    type Handle = HttpIndex;

    async fn lookup(&self, name: &str) -> Result<Option<HttpIndex>, IndexError> {
        let url = self.endpoint(&["v1", "knowledge", "by-name", name])?;
        tracing::debug!("Looking up index '{}' at {}", name, url);

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let info = read_info(response).await?;
        self.handle_for(info).map(Some)
    }

    async fn create(&self, name: &str) -> Result<HttpIndex, IndexError> {
        let url = self.endpoint(&["v1", "knowledge"])?;
        tracing::debug!("Creating index '{}' at {}", name, url);

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&json!({ "name": name }))
            .send()
            .await?;

        let info = read_info(response).await?;
        self.handle_for(info)
    }
}

impl fmt::Debug for HttpIndexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpIndexClient")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &REDACTED)
            .finish()
    }
}

/// Handle to one index on the hosted API
#[derive(Clone)]
pub struct HttpIndex {
    client: Client,
    api_key: String,
    add_url: Url,
    id: String,
    name: String,
}

impl fmt::Debug for HttpIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpIndex")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("add_url", &self.add_url.as_str())
            .field("api_key", &REDACTED)
            .finish()
    }
}

#[async_trait]
impl IndexHandle for HttpIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upsert(&self, document: &IndexDocument) -> Result<(), IndexError> {
        let response = self
            .client
            .post(self.add_url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(document)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }
}

/// Decodes an `{id, name}` body, or converts a failure status into an error
async fn read_info(response: Response) -> Result<IndexInfo, IndexError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| IndexError::Decode(e.to_string()))
}

/// Builds an [`IndexError::Api`] from a non-success response
async fn api_error(response: Response) -> IndexError {
    let status = response.status();
    let message = match response.text().await {
        Ok(body) if !body.trim().is_empty() => body,
        _ => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    IndexError::Api {
        status: status.as_u16(),
        message,
    }
}
