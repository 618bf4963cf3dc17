//! JSON snapshot backend for the `file://` database URI.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::memory::Entries;
use super::{Change, Collection, Document, MemoryCollection, StoreError};

/// Collection persisted as a JSON array at `<dir>/<collection>.json`.
///
/// Reads are served from memory. A mutation is applied to a copy of the
/// documents, the copy is written through a temporary file and a rename, and
/// only then does it replace what readers see. A failed write leaves both the
/// snapshot and the in-memory documents as they were.
pub struct JsonFileCollection<D> {
    path: PathBuf,
    documents: MemoryCollection<D>,
}

impl<D: Document> JsonFileCollection<D> {
    pub async fn open(dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{}.json", D::COLLECTION));
        let documents = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Vec<D>>(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        debug!(collection = D::COLLECTION, count = documents.len(), path = %path.display(), "loaded snapshot");
        Ok(Self {
            path,
            documents: MemoryCollection::with_documents(documents),
        })
    }

    async fn write_snapshot(&self, documents: &[D]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(documents)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Run `change` on a copy, persist the copy if it changed, then publish it.
    async fn commit<R: Send>(
        &self,
        change: impl FnOnce(&mut Entries<D>) -> Result<R, StoreError> + Send,
    ) -> Result<R, StoreError> {
        let mut current = self.documents.lock().await;
        let mut next = current.clone();
        let outcome = change(&mut next)?;
        if next.revision() != current.revision() {
            self.write_snapshot(&next.in_write_order()).await?;
            *current = next;
        }
        Ok(outcome)
    }
}

#[async_trait]
impl<D: Document> Collection<D> for JsonFileCollection<D> {
    async fn find_all(&self) -> Result<Vec<D>, StoreError> {
        self.documents.find_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<D>, StoreError> {
        self.documents.find_by_id(id).await
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<D>, StoreError> {
        self.documents.find_by_ids(ids).await
    }

    async fn insert(&self, document: D) -> Result<D, StoreError> {
        self.commit(|entries| entries.insert(document)).await
    }

    async fn update_with(&self, id: &str, change: Change<D>) -> Result<Option<D>, StoreError> {
        self.commit(|entries| entries.update_with(id, change)).await
    }

    async fn delete(&self, id: &str) -> Result<Option<D>, StoreError> {
        self.commit(|entries| Ok(entries.delete(id))).await
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let current = self.documents.lock().await;
        self.write_snapshot(&current.in_write_order()).await
    }
}
