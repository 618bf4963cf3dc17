//! Synchronous client core for the wardrobe service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host supplies a
//! [`Transport`] that performs the actual round-trip, which keeps the core
//! deterministic and testable.
//!
//! # Design
//! - `WardrobeClient` is stateless; it holds only the API base URL.
//! - Each endpoint is split into `build_*` and `parse_*`.
//! - `state` mirrors the server collections in two slices driven by
//!   three-phase actions. `compose` and `upload` implement the outfit and
//!   apparel forms on top of the slices.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod compose;
pub mod error;
pub mod http;
pub mod state;
pub mod types;
pub mod upload;

pub use client::WardrobeClient;
pub use compose::{ComposeError, FormError, OutfitComposer, OutfitForm};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use state::{failure_notice, Status, Store};
pub use types::{
    Apparel, ApparelRef, ApparelType, CreateApparel, CreateOutfit, Outfit, UpdateApparel, UpdateOutfit,
    UploadFile,
};
pub use upload::{submit_apparel, ApparelForm, SubmitError};
