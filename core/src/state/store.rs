//! The `Store` and its thunk-style action runners.
//!
//! # Design
//! Each runner dispatches `Pending`, performs one round-trip through the
//! caller's `Transport`, then dispatches `Fulfilled` or `Rejected`. A
//! rejection is also returned to the caller as `ActionFailed` so forms can
//! show it without reading the slice.

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::WardrobeClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{Apparel, CreateApparel, CreateOutfit, Outfit, UpdateApparel, UpdateOutfit};

use super::{ApparelAction, ApparelState, OutfitAction, OutfitState, Phase};

/// A dispatched action ended in its rejected phase.
///
/// `message` is the text stored on the slice, i.e. the server's message or
/// the action's fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ActionFailed {
    pub message: String,
    #[source]
    pub source: ApiError,
}

/// Formats the user-facing notice for a failed action, e.g.
/// `failure_notice("creating outfit", "Failed to create outfit")`.
pub fn failure_notice(action: &str, message: &str) -> String {
    format!("Error {action}: {message}")
}

/// Both slices plus the client used to reach the API.
#[derive(Debug, Clone)]
pub struct Store {
    client: WardrobeClient,
    pub apparel: ApparelState,
    pub outfits: OutfitState,
}

fn round_trip<T>(
    transport: &dyn Transport,
    request: Result<HttpRequest, ApiError>,
    parse: impl FnOnce(HttpResponse) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let request = request?;
    debug!(method = request.method.as_str(), path = %request.path, "dispatching request");
    parse(transport.execute(request)?)
}

impl Store {
    pub fn new(client: WardrobeClient) -> Self {
        Self {
            client,
            apparel: ApparelState::default(),
            outfits: OutfitState::default(),
        }
    }

    pub fn client(&self) -> &WardrobeClient {
        &self.client
    }

    pub fn dispatch_apparel(&mut self, action: ApparelAction) {
        self.apparel.reduce(action);
    }

    pub fn dispatch_outfit(&mut self, action: OutfitAction) {
        self.outfits.reduce(action);
    }

    fn apparel_thunk<T: Clone>(
        &mut self,
        name: &str,
        wrap: fn(Phase<T>) -> ApparelAction,
        call: impl FnOnce(&WardrobeClient) -> Result<T, ApiError>,
    ) -> Result<T, ActionFailed> {
        self.apparel.reduce(wrap(Phase::Pending));
        match call(&self.client) {
            Ok(value) => {
                self.apparel.reduce(wrap(Phase::Fulfilled(value.clone())));
                Ok(value)
            }
            Err(source) => {
                warn!(action = name, error = %source, "apparel action rejected");
                self.apparel
                    .reduce(wrap(Phase::Rejected(source.server_message().map(str::to_string))));
                Err(ActionFailed {
                    message: self.apparel.error.clone().unwrap_or_default(),
                    source,
                })
            }
        }
    }

    fn outfit_thunk<T: Clone>(
        &mut self,
        name: &str,
        wrap: fn(Phase<T>) -> OutfitAction,
        call: impl FnOnce(&WardrobeClient) -> Result<T, ApiError>,
    ) -> Result<T, ActionFailed> {
        self.outfits.reduce(wrap(Phase::Pending));
        match call(&self.client) {
            Ok(value) => {
                self.outfits.reduce(wrap(Phase::Fulfilled(value.clone())));
                Ok(value)
            }
            Err(source) => {
                warn!(action = name, error = %source, "outfit action rejected");
                self.outfits
                    .reduce(wrap(Phase::Rejected(source.server_message().map(str::to_string))));
                Err(ActionFailed {
                    message: self.outfits.error.clone().unwrap_or_default(),
                    source,
                })
            }
        }
    }

    // --- apparel ---

    pub fn fetch_all_apparel(&mut self, transport: &dyn Transport) -> Result<Vec<Apparel>, ActionFailed> {
        self.apparel_thunk("apparel/fetchAll", ApparelAction::FetchAll, |client| {
            round_trip(transport, Ok(client.build_list_apparel()), |r| client.parse_list_apparel(r))
        })
    }

    pub fn create_apparel(
        &mut self,
        transport: &dyn Transport,
        input: &CreateApparel,
    ) -> Result<Apparel, ActionFailed> {
        self.apparel_thunk("apparel/create", ApparelAction::Create, |client| {
            round_trip(transport, client.build_create_apparel(input), |r| {
                client.parse_create_apparel(r)
            })
        })
    }

    pub fn update_apparel(
        &mut self,
        transport: &dyn Transport,
        id: &str,
        input: &UpdateApparel,
    ) -> Result<Apparel, ActionFailed> {
        self.apparel_thunk("apparel/update", ApparelAction::Update, |client| {
            round_trip(transport, client.build_update_apparel(id, input), |r| {
                client.parse_update_apparel(r)
            })
        })
    }

    /// Fulfils with the deleted id once the server confirms.
    pub fn delete_apparel(&mut self, transport: &dyn Transport, id: &str) -> Result<String, ActionFailed> {
        self.apparel_thunk("apparel/delete", ApparelAction::Delete, |client| {
            round_trip(transport, Ok(client.build_delete_apparel(id)), |r| {
                client.parse_delete_apparel(r)
            })
            .map(|_| id.to_string())
        })
    }

    // --- outfits ---

    pub fn fetch_all_outfits(&mut self, transport: &dyn Transport) -> Result<Vec<Outfit>, ActionFailed> {
        self.outfit_thunk("outfit/fetchAll", OutfitAction::FetchAll, |client| {
            round_trip(transport, Ok(client.build_list_outfits()), |r| client.parse_list_outfits(r))
        })
    }

    pub fn create_outfit(&mut self, transport: &dyn Transport, input: &CreateOutfit) -> Result<Outfit, ActionFailed> {
        self.outfit_thunk("outfit/create", OutfitAction::Create, |client| {
            round_trip(transport, client.build_create_outfit(input), |r| {
                client.parse_create_outfit(r)
            })
        })
    }

    pub fn update_outfit(
        &mut self,
        transport: &dyn Transport,
        id: &str,
        input: &UpdateOutfit,
    ) -> Result<Outfit, ActionFailed> {
        self.outfit_thunk("outfit/update", OutfitAction::Update, |client| {
            round_trip(transport, client.build_update_outfit(id, input), |r| {
                client.parse_update_outfit(r)
            })
        })
    }

    pub fn delete_outfit(&mut self, transport: &dyn Transport, id: &str) -> Result<String, ActionFailed> {
        self.outfit_thunk("outfit/delete", OutfitAction::Delete, |client| {
            round_trip(transport, Ok(client.build_delete_outfit(id)), |r| {
                client.parse_delete_outfit(r)
            })
            .map(|_| id.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::http::HttpMethod;
    use crate::state::Status;
    use crate::types::ApparelType;

    /// Replays canned responses and records every request it was given.
    #[derive(Default)]
    struct Scripted {
        responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            self
        }

        fn fail(self) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Err(ApiError::Transport("connection refused".to_string())));
            self
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".to_string())))
        }
    }

    fn store() -> Store {
        Store::new(WardrobeClient::new("http://api.test/api/"))
    }

    fn apparel_json(id: &str, kind: &str) -> String {
        format!(
            r#"{{"id":"{id}","title":"Item {id}","pictureURL":"https://img/{id}.jpg","type":"{kind}","createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:00Z"}}"#
        )
    }

    fn outfit_json(id: &str) -> String {
        format!(
            r#"{{"id":"{id}","title":"Outfit {id}","topID":"t1","bottomID":"b1","shoesID":"s1","tags":["casual"],"createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:00Z"}}"#
        )
    }

    #[test]
    fn fetch_all_apparel_buckets_results() {
        let transport = Scripted::default().reply(
            200,
            &format!("[{},{}]", apparel_json("t1", "TOP"), apparel_json("c1", "COAT")),
        );
        let mut store = store();
        let items = store.fetch_all_apparel(&transport).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(store.apparel.status, Status::Succeeded);
        assert_eq!(store.apparel.items.get(ApparelType::Coat)[0].id, "c1");
        assert_eq!(transport.seen.borrow()[0].path, "http://api.test/api/apparel");
    }

    #[test]
    fn empty_wardrobe_fails_the_fetch_with_server_message() {
        let transport =
            Scripted::default().reply(404, r#"{"message":"No apparel items were found","data":[]}"#);
        let mut store = store();
        let err = store.fetch_all_apparel(&transport).unwrap_err();

        assert!(matches!(err.source, ApiError::NotFound { .. }));
        assert_eq!(store.apparel.status, Status::Failed);
        assert_eq!(store.apparel.error.as_deref(), Some("No apparel items were found"));
        assert!(store.apparel.items.is_empty());
    }

    #[test]
    fn no_outfits_fails_the_fetch_with_server_message() {
        let transport =
            Scripted::default().reply(404, r#"{"message":"No outfits were found","data":[]}"#);
        let mut store = store();
        let err = store.fetch_all_outfits(&transport).unwrap_err();

        assert_eq!(err.message, "No outfits were found");
        assert_eq!(store.outfits.status, Status::Failed);
    }

    #[test]
    fn server_message_is_stored_on_rejection() {
        let transport = Scripted::default().reply(400, r#"{"message":"Missing required fields"}"#);
        let mut store = store();
        let input = CreateApparel {
            title: "Tee".to_string(),
            picture_url: String::new(),
            description: None,
            kind: ApparelType::Top,
        };
        let err = store.create_apparel(&transport, &input).unwrap_err();

        assert_eq!(err.message, "Missing required fields");
        assert_eq!(store.apparel.status, Status::Failed);
        assert_eq!(store.apparel.error.as_deref(), Some("Missing required fields"));
    }

    #[test]
    fn transport_failure_uses_fallback_message() {
        let transport = Scripted::default().fail();
        let mut store = store();
        let err = store.fetch_all_outfits(&transport).unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch outfits");
        assert!(matches!(err.source, ApiError::Transport(_)));
        assert_eq!(
            failure_notice("fetching outfits", &err.message),
            "Error fetching outfits: Failed to fetch outfits"
        );
    }

    #[test]
    fn outfit_lifecycle_updates_the_slice() {
        let transport = Scripted::default()
            .reply(201, &outfit_json("o1"))
            .reply(200, r#"{"message":"Outfit with ID o1 deleted successfully"}"#);
        let mut store = store();
        let input = CreateOutfit {
            title: "Outfit".to_string(),
            description: None,
            top_id: "t1".to_string(),
            bottom_id: "b1".to_string(),
            shoes_id: "s1".to_string(),
            coat_id: None,
            tags: vec!["casual".to_string()],
        };

        store.create_outfit(&transport, &input).unwrap();
        assert_eq!(store.outfits.items.len(), 1);

        assert_eq!(store.delete_outfit(&transport, "o1").unwrap(), "o1");
        assert!(store.outfits.items.is_empty());

        let seen = transport.seen.borrow();
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[1].method, HttpMethod::Delete);
        assert_eq!(seen[1].path, "http://api.test/api/outfit/o1");
    }

    #[test]
    fn failed_delete_leaves_items_untouched() {
        let transport = Scripted::default()
            .reply(200, &format!("[{}]", apparel_json("t1", "TOP")))
            .reply(404, r#"{"message":"Apparel with ID t1 not found"}"#);
        let mut store = store();
        store.fetch_all_apparel(&transport).unwrap();

        let err = store.delete_apparel(&transport, "t1").unwrap_err();
        assert_eq!(err.message, "Apparel with ID t1 not found");
        assert_eq!(store.apparel.items.len(), 1);
    }

    #[test]
    fn update_apparel_moves_item_to_new_bucket() {
        let transport = Scripted::default()
            .reply(200, &format!("[{}]", apparel_json("x1", "TOP")))
            .reply(200, &apparel_json("x1", "COAT"));
        let mut store = store();
        store.fetch_all_apparel(&transport).unwrap();
        let patch = UpdateApparel {
            kind: Some(ApparelType::Coat),
            ..UpdateApparel::default()
        };
        store.update_apparel(&transport, "x1", &patch).unwrap();

        assert!(store.apparel.items.top.is_empty());
        assert_eq!(store.apparel.items.coat.len(), 1);
    }

    #[test]
    fn update_outfit_sends_put() {
        let transport = Scripted::default().reply(200, &outfit_json("o1"));
        let mut store = store();
        store.dispatch_outfit(OutfitAction::Clear);
        let patch = UpdateOutfit {
            title: Some("Outfit o1".to_string()),
            ..UpdateOutfit::default()
        };
        let updated = store.update_outfit(&transport, "o1", &patch).unwrap();
        assert_eq!(updated.title, "Outfit o1");
        assert_eq!(transport.seen.borrow()[0].method, HttpMethod::Put);
    }
}
