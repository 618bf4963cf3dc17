//! Client-side state slices for apparel and outfits.
//!
//! # Design
//! Each slice is a plain struct with a `reduce` method that applies one
//! action. Async operations are modelled as three-phase actions
//! (`Phase::Pending`, `Phase::Fulfilled`, `Phase::Rejected`) that the
//! [`Store`] dispatches around a blocking `Transport` round-trip. State only
//! changes after the round-trip resolves; there are no optimistic updates.

mod apparel;
mod outfit;
mod store;

pub use apparel::{ApparelAction, ApparelBuckets, ApparelState};
pub use outfit::{OutfitAction, OutfitState};
pub use store::{failure_notice, ActionFailed, Store};

/// Lifecycle of the most recent async action on a slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// One phase of an async action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    Pending,
    Fulfilled(T),
    /// Carries the server's message when one was returned.
    Rejected(Option<String>),
}
