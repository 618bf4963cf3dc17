//! Document store backing the apparel and outfit collections.
//!
//! # Design
//! Each collection is reached through the `Collection` trait so the services
//! never know whether documents live in process memory or in JSON snapshots on
//! disk. Documents are addressed by their external `id` string, never by a
//! storage-internal key. Schema rules live on the document type (`Document::
//! validate`) and are enforced by every backend on insert and update.

mod connection;
mod error;
mod file;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use connection::{Connection, Database};
pub use error::{SchemaError, StoreError};
pub use file::JsonFileCollection;
pub use memory::MemoryCollection;

/// In-place edit applied by [`Collection::update_with`].
pub type Change<D> = Box<dyn FnOnce(&mut D) + Send>;

/// A record that can be stored in a collection.
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name, also used as the snapshot file stem.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn updated_at(&self) -> DateTime<Utc>;

    /// Schema rules checked on every write.
    fn validate(&self) -> Result<(), SchemaError>;
}

/// CRUD access to one collection of documents.
///
/// Lookups by id return `Ok(None)` when nothing matches; `Err` is reserved
/// for schema violations and backend failures.
#[async_trait]
pub trait Collection<D: Document>: Send + Sync {
    /// All documents, most recently updated first.
    async fn find_all(&self) -> Result<Vec<D>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<D>, StoreError>;

    /// Documents whose id is in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<D>, StoreError>;

    async fn insert(&self, document: D) -> Result<D, StoreError>;

    /// Apply `change` to the stored document with `id` and write the result
    /// back, all under one write lock. `Ok(None)` if absent. The changed
    /// document is schema-checked before it is stored.
    async fn update_with(&self, id: &str, change: Change<D>) -> Result<Option<D>, StoreError>;

    /// Remove and return the document with `id`. `Ok(None)` if absent.
    async fn delete(&self, id: &str) -> Result<Option<D>, StoreError>;

    /// Persist any buffered state. No-op for purely in-memory backends.
    async fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
