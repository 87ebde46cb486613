//! Capability traits for the external search index

use crate::index::{IndexDocument, IndexError};
use async_trait::async_trait;

/// A provider of named indexes
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Handle type returned for one index
    type Handle: IndexHandle;

    /// Looks up an index by name
    ///
    /// Returns `Ok(None)` when no index with that name exists.
    async fn lookup(&self, name: &str) -> Result<Option<Self::Handle>, IndexError>;

    /// Creates a new index with the given name
    async fn create(&self, name: &str) -> Result<Self::Handle, IndexError>;
}

/// A single index that accepts documents
#[async_trait]
pub trait IndexHandle: Send + Sync {
    /// Name of the index this handle points at
    fn name(&self) -> &str;

    /// Inserts or overwrites the document stored under `document.key`
    async fn upsert(&self, document: &IndexDocument) -> Result<(), IndexError>;
}
