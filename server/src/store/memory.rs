//! Process-local collection, also the in-memory half of the file backend.
//!
//! # Design
//! All mutations are methods on `Entries`, which is plain data behind a
//! tokio `RwLock`. `JsonFileCollection` runs the same methods on a copy and
//! swaps the copy in only once the snapshot is on disk.

use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockWriteGuard};

use super::{Change, Collection, Document, StoreError};

#[derive(Clone)]
struct Entry<D> {
    revision: u64,
    document: D,
}

/// Documents plus the write counter that orders them.
#[derive(Clone)]
pub(super) struct Entries<D> {
    entries: Vec<Entry<D>>,
    next_revision: u64,
}

impl<D: Document> Entries<D> {
    fn bump(&mut self) -> u64 {
        self.next_revision += 1;
        self.next_revision
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.document.id() == id)
    }

    /// Number of writes applied so far. Unchanged means nothing was written.
    pub(super) fn revision(&self) -> u64 {
        self.next_revision
    }

    /// Documents in write order, oldest first.
    pub(super) fn in_write_order(&self) -> Vec<D> {
        let mut entries: Vec<&Entry<D>> = self.entries.iter().collect();
        entries.sort_by_key(|entry| entry.revision);
        entries.into_iter().map(|entry| entry.document.clone()).collect()
    }

    pub(super) fn insert(&mut self, document: D) -> Result<D, StoreError> {
        document.validate()?;
        if self.position(document.id()).is_some() {
            return Err(StoreError::DuplicateId(document.id().to_string()));
        }
        let revision = self.bump();
        self.entries.push(Entry {
            revision,
            document: document.clone(),
        });
        Ok(document)
    }

    pub(super) fn update_with(&mut self, id: &str, change: Change<D>) -> Result<Option<D>, StoreError> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        let mut document = self.entries[index].document.clone();
        change(&mut document);
        document.validate()?;
        let revision = self.bump();
        self.entries[index] = Entry {
            revision,
            document: document.clone(),
        };
        Ok(Some(document))
    }

    pub(super) fn delete(&mut self, id: &str) -> Option<D> {
        let index = self.position(id)?;
        self.bump();
        Some(self.entries.remove(index).document)
    }
}

/// Process-local collection.
///
/// Every write stamps the entry with a monotonically increasing revision so
/// documents sharing an `updated_at` still list in write order.
pub struct MemoryCollection<D> {
    inner: RwLock<Entries<D>>,
}

impl<D: Document> Default for MemoryCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> MemoryCollection<D> {
    pub fn new() -> Self {
        Self::with_documents(Vec::new())
    }

    /// Seed the collection; later documents count as more recent writes.
    pub fn with_documents(documents: Vec<D>) -> Self {
        let entries: Vec<Entry<D>> = documents
            .into_iter()
            .zip(1u64..)
            .map(|(document, revision)| Entry { revision, document })
            .collect();
        let next_revision = entries.len() as u64;
        Self {
            inner: RwLock::new(Entries {
                entries,
                next_revision,
            }),
        }
    }

    /// Exclusive access for callers that must finish other work before a
    /// change becomes visible.
    pub(super) async fn lock(&self) -> RwLockWriteGuard<'_, Entries<D>> {
        self.inner.write().await
    }
}

#[async_trait]
impl<D: Document> Collection<D> for MemoryCollection<D> {
    async fn find_all(&self) -> Result<Vec<D>, StoreError> {
        let inner = self.inner.read().await;
        let mut entries: Vec<&Entry<D>> = inner.entries.iter().collect();
        entries.sort_by_key(|entry| Reverse((entry.document.updated_at(), entry.revision)));
        Ok(entries.into_iter().map(|entry| entry.document.clone()).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<D>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .iter()
            .find(|entry| entry.document.id() == id)
            .map(|entry| entry.document.clone()))
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<D>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .iter()
            .filter(|entry| ids.iter().any(|id| id == entry.document.id()))
            .map(|entry| entry.document.clone())
            .collect())
    }

    async fn insert(&self, document: D) -> Result<D, StoreError> {
        self.inner.write().await.insert(document)
    }

    async fn update_with(&self, id: &str, change: Change<D>) -> Result<Option<D>, StoreError> {
        self.inner.write().await.update_with(id, change)
    }

    async fn delete(&self, id: &str) -> Result<Option<D>, StoreError> {
        Ok(self.inner.write().await.delete(id))
    }
}
