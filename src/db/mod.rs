//! Persistence gateway.
//!
//! Resources are stored as schema-less JSON documents grouped in named
//! collections. Every document carries its own `id` field, and all
//! operations are atomic at the single-document level only.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::DatabaseConfig;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A stored record: field name to JSON value.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Unavailable(String),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("document {0} already exists")]
    DuplicateId(String),

    #[error("{0}")]
    Corrupt(String),

    #[error("store rejected the call: {0}")]
    Backend(String),

    #[error("unsupported database url {0:?}")]
    UnsupportedUrl(String),
}

impl StoreError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

/// Query shape for [`DocumentStore::find_many`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<SortSpec>,
    pub limit: usize,
}

impl FindOptions {
    pub fn limit(limit: usize) -> Self {
        Self { sort: None, limit }
    }

    pub fn sorted_by(mut self, field: &'static str, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec { field, direction });
        self
    }
}

/// Operations every document store backend provides.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document. The document must already hold its `id`.
    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn find_many(
        &self,
        collection: &str,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    /// Overwrite only the given fields. Returns the number of documents matched.
    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<u64, StoreError>;

    /// Returns the number of documents removed.
    async fn delete(&self, collection: &str, id: &str) -> Result<u64, StoreError>;
}

/// Open the backend selected by `config.url`.
///
/// `memory://` yields a process-local store, `sqlite:` URLs a pooled SQLite
/// database with its schema migrated.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    if config.url.starts_with("memory:") {
        tracing::warn!("using in-memory document store; data is lost on shutdown");
        return Ok(Arc::new(MemoryStore::new()));
    }
    if config.url.starts_with("sqlite:") {
        let store = SqliteStore::connect(config).await?;
        store.run_migrations().await?;
        return Ok(Arc::new(store));
    }
    Err(StoreError::UnsupportedUrl(config.url.clone()))
}

pub(crate) fn document_id(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}
