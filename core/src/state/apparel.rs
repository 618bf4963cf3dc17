//! Apparel slice: items bucketed by category.

use crate::types::{Apparel, ApparelType};

use super::{Phase, Status};

const FETCH_FAILED: &str = "Failed to fetch apparel items";
const CREATE_FAILED: &str = "Failed to create apparel item";
const UPDATE_FAILED: &str = "Failed to update apparel item";
const DELETE_FAILED: &str = "Failed to delete apparel item";

/// Apparel items grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApparelBuckets {
    pub top: Vec<Apparel>,
    pub bottom: Vec<Apparel>,
    pub shoes: Vec<Apparel>,
    pub coat: Vec<Apparel>,
}

impl ApparelBuckets {
    pub fn get(&self, kind: ApparelType) -> &[Apparel] {
        match kind {
            ApparelType::Top => &self.top,
            ApparelType::Bottom => &self.bottom,
            ApparelType::Shoes => &self.shoes,
            ApparelType::Coat => &self.coat,
        }
    }

    fn get_mut(&mut self, kind: ApparelType) -> &mut Vec<Apparel> {
        match kind {
            ApparelType::Top => &mut self.top,
            ApparelType::Bottom => &mut self.bottom,
            ApparelType::Shoes => &mut self.shoes,
            ApparelType::Coat => &mut self.coat,
        }
    }

    /// Append `apparel` to the bucket of its own type.
    pub fn push(&mut self, apparel: Apparel) {
        self.get_mut(apparel.kind).push(apparel);
    }

    /// Remove the item with `id` from whichever bucket holds it.
    pub fn remove(&mut self, id: &str) -> Option<Apparel> {
        ApparelType::ALL.into_iter().find_map(|kind| {
            let bucket = self.get_mut(kind);
            let index = bucket.iter().position(|item| item.id == id)?;
            Some(bucket.remove(index))
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn len(&self) -> usize {
        ApparelType::ALL.iter().map(|kind| self.get(*kind).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the item in place when its type is unchanged, otherwise move
    /// it to the end of its new bucket. Unknown ids are appended.
    fn upsert(&mut self, apparel: Apparel) {
        let bucket = self.get_mut(apparel.kind);
        if let Some(slot) = bucket.iter_mut().find(|item| item.id == apparel.id) {
            *slot = apparel;
            return;
        }
        self.remove(&apparel.id);
        self.push(apparel);
    }
}

impl FromIterator<Apparel> for ApparelBuckets {
    fn from_iter<I: IntoIterator<Item = Apparel>>(iter: I) -> Self {
        let mut buckets = Self::default();
        for apparel in iter {
            buckets.push(apparel);
        }
        buckets
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApparelAction {
    FetchAll(Phase<Vec<Apparel>>),
    Create(Phase<Apparel>),
    Update(Phase<Apparel>),
    /// Fulfilled with the deleted item's id.
    Delete(Phase<String>),
    Clear,
    Add(Apparel),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApparelState {
    pub items: ApparelBuckets,
    pub status: Status,
    pub error: Option<String>,
}

impl ApparelState {
    pub fn reduce(&mut self, action: ApparelAction) {
        match action {
            ApparelAction::FetchAll(phase) => self.apply(phase, FETCH_FAILED, |items, all| {
                *items = all.into_iter().collect();
            }),
            ApparelAction::Create(phase) => self.apply(phase, CREATE_FAILED, ApparelBuckets::push),
            ApparelAction::Update(phase) => self.apply(phase, UPDATE_FAILED, ApparelBuckets::upsert),
            ApparelAction::Delete(phase) => self.apply(phase, DELETE_FAILED, |items, id| {
                items.remove(&id);
            }),
            ApparelAction::Clear => self.items.clear(),
            ApparelAction::Add(apparel) => self.items.push(apparel),
        }
    }

    fn apply<T>(&mut self, phase: Phase<T>, fallback: &str, on_success: impl FnOnce(&mut ApparelBuckets, T)) {
        match phase {
            Phase::Pending => {
                self.status = Status::Loading;
                self.error = None;
            }
            Phase::Fulfilled(value) => {
                self.status = Status::Succeeded;
                on_success(&mut self.items, value);
            }
            Phase::Rejected(message) => {
                self.status = Status::Failed;
                self.error = Some(message.unwrap_or_else(|| fallback.to_string()));
            }
        }
    }
}
