//! Search index module
//!
//! This module models the external full-text index as an injectable
//! capability:
//! - [`SearchIndex`] looks up or creates an index by name
//! - [`IndexHandle`] upserts documents into one index, keyed by URL
//! - [`HttpIndexClient`] talks to the hosted index API
//! - [`MemoryIndex`] keeps everything in process

mod http;
mod memory;
mod traits;

pub use http::{HttpIndex, HttpIndexClient};
pub use memory::{MemoryIndex, MemoryIndexHandle};
pub use traits::{IndexHandle, SearchIndex};

use crate::url::CanonicalUrl;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the search index
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index provider rejected the request
    #[error("Index API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Index request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected index API response: {0}")]
    Decode(String),
}

impl IndexError {
    /// Returns true if the provider itself reported the failure
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Metadata stored alongside each document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub url: String,
}

/// One page's worth of text, ready for the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Stable key; resubmitting the same key overwrites
    pub key: String,
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl IndexDocument {
    /// Builds the document for a page, keyed by its canonical URL
    pub fn for_page(url: &CanonicalUrl, content: String) -> Self {
        Self {
            key: url.as_str().to_string(),
            content,
            metadata: DocumentMetadata {
                url: url.as_str().to_string(),
            },
        }
    }
}

/// Looks up an index by name, creating it if it does not exist
pub async fn open_or_create<S: SearchIndex>(
    index: &S,
    name: &str,
) -> Result<S::Handle, IndexError> {
    if let Some(handle) = index.lookup(name).await? {
        tracing::info!("Using existing index '{}'", name);
        return Ok(handle);
    }

    tracing::info!("Index '{}' not found, creating it", name);
    index.create(name).await
}
