//! Outfit CRUD plus the populate step that joins apparel references.
//!
//! # Design
//! Outfits store apparel ids as plain strings. Reads resolve them against the
//! apparel collection's external `id` with a single batched lookup per call,
//! then substitute the documents in place. A reference that no longer
//! resolves is dropped from the result; it never fails the read.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Apparel, NewOutfit, Outfit, PopulatedOutfit, UpdateOutfit};
use crate::store::{Collection, Connection, StoreError};

#[derive(Clone)]
pub struct OutfitService {
    connection: Arc<Connection>,
}

impl OutfitService {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    /// All outfits, most recently updated first, references populated.
    pub async fn list(&self) -> Result<Vec<PopulatedOutfit>, StoreError> {
        let database = self.connection.database().await?;
        let outfits = database.outfits.find_all().await?;
        populate(database.apparel.as_ref(), outfits).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<PopulatedOutfit>, StoreError> {
        let database = self.connection.database().await?;
        let Some(outfit) = database.outfits.find_by_id(id).await? else {
            return Ok(None);
        };
        let mut populated = populate(database.apparel.as_ref(), vec![outfit]).await?;
        Ok(populated.pop())
    }

    pub async fn create(&self, input: NewOutfit) -> Result<Outfit, StoreError> {
        let now = Utc::now();
        let outfit = Outfit {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            top_id: input.top_id,
            bottom_id: input.bottom_id,
            shoes_id: input.shoes_id,
            coat_id: input.coat_id,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        };
        self.connection.database().await?.outfits.insert(outfit).await
    }

    /// Merge `patch` into the stored outfit. The result is not populated.
    pub async fn update(&self, id: &str, patch: UpdateOutfit) -> Result<Option<Outfit>, StoreError> {
        let now = Utc::now();
        let merge = move |outfit: &mut Outfit| {
            if let Some(title) = patch.title {
                outfit.title = title;
            }
            if let Some(description) = patch.description {
                outfit.description = Some(description);
            }
            if let Some(top_id) = patch.top_id {
                outfit.top_id = top_id;
            }
            if let Some(bottom_id) = patch.bottom_id {
                outfit.bottom_id = bottom_id;
            }
            if let Some(shoes_id) = patch.shoes_id {
                outfit.shoes_id = shoes_id;
            }
            if let Some(coat_id) = patch.coat_id {
                outfit.coat_id = Some(coat_id);
            }
            if let Some(tags) = patch.tags {
                outfit.tags = tags;
            }
            outfit.updated_at = now;
        };
        self.connection
            .database()
            .await?
            .outfits
            .update_with(id, Box::new(merge))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Outfit>, StoreError> {
        self.connection.database().await?.outfits.delete(id).await
    }
}

/// Replace every outfit's apparel ids with the documents they name.
pub async fn populate(
    apparel: &dyn Collection<Apparel>,
    outfits: Vec<Outfit>,
) -> Result<Vec<PopulatedOutfit>, StoreError> {
    let mut ids: Vec<String> = outfits
        .iter()
        .flat_map(Outfit::apparel_ids)
        .map(str::to_string)
        .collect();
    ids.sort();
    ids.dedup();

    let found: HashMap<String, Apparel> = apparel
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|item| (item.id.clone(), item))
        .collect();
    debug!(requested = ids.len(), resolved = found.len(), "populated apparel references");

    let lookup = |id: &str| found.get(id).cloned();
    Ok(outfits
        .into_iter()
        .map(|outfit| PopulatedOutfit {
            top: lookup(&outfit.top_id),
            bottom: lookup(&outfit.bottom_id),
            shoes: lookup(&outfit.shoes_id),
            coat: outfit.coat_id.as_deref().and_then(lookup),
            id: outfit.id,
            title: outfit.title,
            description: outfit.description,
            tags: outfit.tags,
            created_at: outfit.created_at,
            updated_at: outfit.updated_at,
        })
        .collect())
}
