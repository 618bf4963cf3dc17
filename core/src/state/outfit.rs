//! Outfit slice: a flat list kept in server order.

use crate::types::Outfit;

use super::{Phase, Status};

const FETCH_FAILED: &str = "Failed to fetch outfits";
const CREATE_FAILED: &str = "Failed to create outfit";
const UPDATE_FAILED: &str = "Failed to update outfit";
const DELETE_FAILED: &str = "Failed to delete outfit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutfitAction {
    FetchAll(Phase<Vec<Outfit>>),
    Create(Phase<Outfit>),
    Update(Phase<Outfit>),
    /// Fulfilled with the deleted outfit's id.
    Delete(Phase<String>),
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutfitState {
    pub items: Vec<Outfit>,
    pub status: Status,
    pub error: Option<String>,
}

impl OutfitState {
    pub fn reduce(&mut self, action: OutfitAction) {
        match action {
            OutfitAction::FetchAll(phase) => self.apply(phase, FETCH_FAILED, |items, all| *items = all),
            OutfitAction::Create(phase) => self.apply(phase, CREATE_FAILED, Vec::push),
            OutfitAction::Update(phase) => self.apply(phase, UPDATE_FAILED, |items, outfit| {
                if let Some(slot) = items.iter_mut().find(|o| o.id == outfit.id) {
                    *slot = outfit;
                }
            }),
            OutfitAction::Delete(phase) => self.apply(phase, DELETE_FAILED, |items, id| {
                items.retain(|o| o.id != id);
            }),
            OutfitAction::Clear => self.items.clear(),
        }
    }

    fn apply<T>(&mut self, phase: Phase<T>, fallback: &str, on_success: impl FnOnce(&mut Vec<Outfit>, T)) {
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
