//! Two-step apparel submission: upload the picture, then create the item
//! pointing at the hosted URL.

use thiserror::Error;
use tracing::info;

use crate::error::ApiError;
use crate::http::Transport;
use crate::state::{ActionFailed, Store};
use crate::types::{Apparel, ApparelType, CreateApparel, UploadFile};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("image upload failed: {0}")]
    Upload(#[source] ApiError),

    #[error("Invalid upload response format")]
    InvalidResponse,

    #[error("Missing secure_url in upload response")]
    MissingSecureUrl,

    #[error(transparent)]
    Create(#[from] ActionFailed),
}

/// Details entered alongside the picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApparelForm {
    pub title: String,
    pub description: String,
    pub kind: ApparelType,
}

/// Upload `file` and create an apparel item from `form` with the hosted URL.
///
/// The create step goes through the store, so the new item lands in the
/// apparel slice. Nothing is created when the upload fails.
pub fn submit_apparel(
    store: &mut Store,
    transport: &dyn Transport,
    file: &UploadFile,
    form: &ApparelForm,
) -> Result<Apparel, SubmitError> {
    let client = store.client();
    let response = transport
        .execute(client.build_upload(file))
        .and_then(|response| client.parse_upload(response))
        .map_err(SubmitError::Upload)?;

    let image = response.data.ok_or(SubmitError::InvalidResponse)?;
    let picture_url = image
        .secure_url
        .filter(|url| !url.is_empty())
        .ok_or(SubmitError::MissingSecureUrl)?;
    info!(file = %file.file_name, url = %picture_url, "picture uploaded");

    let description = form.description.trim();
    let input = CreateApparel {
        title: form.title.clone(),
        picture_url,
        description: (!description.is_empty()).then(|| description.to_string()),
        kind: form.kind,
    };
    Ok(store.create_apparel(transport, &input)?)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::client::WardrobeClient;
    use crate::http::{HttpRequest, HttpResponse};

    /// Answers uploads with `upload_body` and apparel creates by echoing a
    /// stored item.
    struct FakeApi {
        upload_status: u16,
        upload_body: &'static str,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl FakeApi {
        fn new(upload_status: u16, upload_body: &'static str) -> Self {
            Self {
                upload_status,
                upload_body,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for FakeApi {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let is_upload = request.path.ends_with("/upload");
            let created = if is_upload {
                None
            } else {
                let body: serde_json::Value =
                    serde_json::from_slice(request.body.as_deref().unwrap_or_default()).unwrap();
                let mut created = body.clone();
                created["id"] = "a1".into();
                created["createdAt"] = "2024-05-01T10:00:00Z".into();
                created["updatedAt"] = "2024-05-01T10:00:00Z".into();
                Some(created.to_string())
            };
            self.requests.borrow_mut().push(request);
            Ok(match created {
                None => HttpResponse {
                    status: self.upload_status,
                    headers: Vec::new(),
                    body: self.upload_body.to_string(),
                },
                Some(body) => HttpResponse {
                    status: 201,
                    headers: Vec::new(),
                    body,
                },
            })
        }
    }

    fn file() -> UploadFile {
        UploadFile {
            file_name: "tee.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    fn form(description: &str) -> ApparelForm {
        ApparelForm {
            title: "Linen tee".to_string(),
            description: description.to_string(),
            kind: ApparelType::Top,
        }
    }

    fn store() -> Store {
        Store::new(WardrobeClient::new("http://api.test/api/"))
    }

    #[test]
    fn uploads_then_creates_with_hosted_url() {
        let api = FakeApi::new(
            201,
            r#"{"message":"Upload successful","data":{"secure_url":"https://cdn/tee.jpg","public_id":"wardrobe/tee"}}"#,
        );
        let mut store = store();
        let apparel = submit_apparel(&mut store, &api, &file(), &form("  ")).unwrap();

        assert_eq!(apparel.picture_url, "https://cdn/tee.jpg");
        assert_eq!(apparel.description, None);
        assert_eq!(store.apparel.items.top.len(), 1);

        let requests = api.requests.borrow();
        assert_eq!(requests.len(), 2);
        let body: serde_json::Value = serde_json::from_slice(requests[1].body.as_deref().unwrap()).unwrap();
        assert!(body.get("description").is_none());
        assert_eq!(body["type"], "TOP");
    }

    #[test]
    fn description_is_kept_when_present() {
        let api = FakeApi::new(201, r#"{"data":{"secure_url":"https://cdn/tee.jpg"}}"#);
        let apparel = submit_apparel(&mut store(), &api, &file(), &form("soft")).unwrap();
        assert_eq!(apparel.description.as_deref(), Some("soft"));
    }

    #[test]
    fn response_without_data_is_invalid() {
        let api = FakeApi::new(201, r#"{"message":"Upload successful"}"#);
        let err = submit_apparel(&mut store(), &api, &file(), &form("")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid upload response format");
        assert_eq!(api.requests.borrow().len(), 1);
    }

    #[test]
    fn response_without_secure_url_is_rejected() {
        let api = FakeApi::new(201, r#"{"data":{"public_id":"wardrobe/tee"}}"#);
        let err = submit_apparel(&mut store(), &api, &file(), &form("")).unwrap_err();
        assert_eq!(err.to_string(), "Missing secure_url in upload response");
    }

    #[test]
    fn failed_upload_creates_nothing() {
        let api = FakeApi::new(500, r#"{"message":"Failed to upload image"}"#);
        let mut store = store();
        let err = submit_apparel(&mut store, &api, &file(), &form("")).unwrap_err();

        match err {
            SubmitError::Upload(source) => {
                assert_eq!(source.server_message(), Some("Failed to upload image"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.apparel.items.is_empty());
    }
}
