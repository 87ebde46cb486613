//! In-process search index
//!
//! Documents live in a map keyed by `IndexDocument::key`, so resubmitting a
//! key overwrites the earlier document. Every upsert call is counted, which
//! lets callers tell "stored once" apart from "submitted once".

use crate::index::{IndexDocument, IndexError, IndexHandle, SearchIndex};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct IndexContents {
    documents: BTreeMap<String, IndexDocument>,
    failure: Option<(u16, String)>,
}

/// A set of named in-memory indexes
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    indexes: Arc<Mutex<HashMap<String, MemoryIndexHandle>>>,
    created: Arc<AtomicUsize>,
}

impl MemoryIndex {
    /// Creates an empty provider with no indexes
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexes created through [`SearchIndex::create`]
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    fn indexes(&self) -> MutexGuard<'_, HashMap<String, MemoryIndexHandle>> {
        self.indexes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    type Handle = MemoryIndexHandle;

    async fn lookup(&self, name: &str) -> Result<Option<MemoryIndexHandle>, IndexError> {
        Ok(self.indexes().get(name).cloned())
    }

    async fn create(&self, name: &str) -> Result<MemoryIndexHandle, IndexError> {
        let handle = self
            .indexes()
            .entry(name.to_string())
            .or_insert_with(|| MemoryIndexHandle::new(name))
            .clone();
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }
}

/// Handle to one in-memory index
///
/// Clones share the same underlying documents.
#[derive(Debug, Clone)]
pub struct MemoryIndexHandle {
    name: String,
    contents: Arc<Mutex<IndexContents>>,
    submissions: Arc<AtomicUsize>,
}

impl MemoryIndexHandle {
    /// Creates a standalone empty index
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            contents: Arc::new(Mutex::new(IndexContents::default())),
            submissions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Makes every following upsert fail with an API error
    pub fn fail_upserts(&self, status: u16, message: &str) {
        self.contents().failure = Some((status, message.to_string()));
    }

    /// Number of upsert calls received, successful or not
    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Stored document for `key`, if any
    pub fn get(&self, key: &str) -> Option<IndexDocument> {
        self.contents().documents.get(key).cloned()
    }

    /// Keys of every stored document, in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.contents().documents.keys().cloned().collect()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.contents().documents.len()
    }

    /// Returns true if no document is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contents(&self) -> MutexGuard<'_, IndexContents> {
        self.contents.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IndexHandle for MemoryIndexHandle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upsert(&self, document: &IndexDocument) -> Result<(), IndexError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);

        let mut contents = self.contents();
        if let Some((status, message)) = &contents.failure {
            return Err(IndexError::Api {
                status: *status,
                message: message.clone(),
            });
        }

        contents
            .documents
            .insert(document.key.clone(), document.clone());
        Ok(())
    }
}
