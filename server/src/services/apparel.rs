//! Apparel CRUD over the `apparel` collection.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Apparel, ApparelPatch, NewApparel};
use crate::store::{Connection, StoreError};

/// CRUD over the apparel collection.
///
/// Field validation is the caller's job; the store still enforces the
/// document schema on every write.
#[derive(Clone)]
pub struct ApparelService {
    connection: Arc<Connection>,
}

impl ApparelService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    pub async fn list(&self) -> Result<Vec<Apparel>, StoreError> {
        self.connection.database().await?.apparel.find_all().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Apparel>, StoreError> {
        self.connection.database().await?.apparel.find_by_id(id).await
    }

    pub async fn create(&self, input: NewApparel) -> Result<Apparel, StoreError> {
        let now = Utc::now();
        let apparel = Apparel {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            picture_url: input.picture_url,
            description: input.description,
            kind: input.kind,
            created_at: now,
            updated_at: now,
        };
        self.connection.database().await?.apparel.insert(apparel).await
    }

    /// Merge `patch` into the stored item. `Ok(None)` when `id` is unknown.
    pub async fn update(&self, id: &str, patch: ApparelPatch) -> Result<Option<Apparel>, StoreError> {
        let now = Utc::now();
        let merge = move |apparel: &mut Apparel| {
            if let Some(title) = patch.title {
                apparel.title = title;
            }
            if let Some(picture_url) = patch.picture_url {
                apparel.picture_url = picture_url;
            }
            if let Some(description) = patch.description {
                apparel.description = Some(description);
            }
            if let Some(kind) = patch.kind {
                apparel.kind = kind;
            }
            apparel.updated_at = now;
        };
        self.connection
            .database()
            .await?
            .apparel
            .update_with(id, Box::new(merge))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Apparel>, StoreError> {
        self.connection.database().await?.apparel.delete(id).await
    }
}
