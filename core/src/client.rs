//! Stateless HTTP request builder and response parser for the wardrobe API.
//!
//! # Design
//! `WardrobeClient` holds only the base API URL. Each endpoint is split into
//! a `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`; the host executes the round-trip in between.
//! Collection endpoints answer 404 with `data: []` when nothing is stored;
//! the list parsers report that as `ApiError::NotFound` carrying the server's
//! message, like any other 404. Ids are percent-encoded as a single path
//! segment.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Apparel, CreateApparel, CreateOutfit, MessageBody, Outfit, UpdateApparel, UpdateOutfit,
    UploadFile, UploadResponse,
};

const JSON: &str = "application/json";
const BOUNDARY: &str = "----wardrobe-core-form-boundary";

#[derive(Debug, Clone)]
pub struct WardrobeClient {
    base_url: String,
}

impl WardrobeClient {
    /// `base_url` is the API root, e.g. `http://localhost:3000/api/`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn bare(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: self.url(path),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<T: Serialize>(&self, method: HttpMethod, path: &str, input: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: self.url(path),
            headers: vec![("content-type".to_string(), JSON.to_string())],
            body: Some(body),
        })
    }

    // --- apparel ---

    pub fn build_list_apparel(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "apparel")
    }

    pub fn build_get_apparel(&self, id: &str) -> HttpRequest {
        self.bare(HttpMethod::Get, &item_path("apparel", id))
    }

    pub fn build_create_apparel(&self, input: &CreateApparel) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "apparel", input)
    }

    pub fn build_update_apparel(&self, id: &str, input: &UpdateApparel) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, &item_path("apparel", id), input)
    }

    pub fn build_delete_apparel(&self, id: &str) -> HttpRequest {
        self.bare(HttpMethod::Delete, &item_path("apparel", id))
    }

    pub fn parse_list_apparel(&self, response: HttpResponse) -> Result<Vec<Apparel>, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_get_apparel(&self, response: HttpResponse) -> Result<Apparel, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_create_apparel(&self, response: HttpResponse) -> Result<Apparel, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_update_apparel(&self, response: HttpResponse) -> Result<Apparel, ApiError> {
        parse_json(response, 200)
    }

    /// Returns the server's confirmation message.
    pub fn parse_delete_apparel(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse_json::<MessageBody>(response, 200).map(|body| body.message)
    }

    // --- outfits ---

    pub fn build_list_outfits(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "outfit")
    }

    pub fn build_get_outfit(&self, id: &str) -> HttpRequest {
        self.bare(HttpMethod::Get, &item_path("outfit", id))
    }

    pub fn build_create_outfit(&self, input: &CreateOutfit) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "outfit", input)
    }

    pub fn build_update_outfit(&self, id: &str, input: &UpdateOutfit) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, &item_path("outfit", id), input)
    }

    pub fn build_delete_outfit(&self, id: &str) -> HttpRequest {
        self.bare(HttpMethod::Delete, &item_path("outfit", id))
    }

    pub fn parse_list_outfits(&self, response: HttpResponse) -> Result<Vec<Outfit>, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_get_outfit(&self, response: HttpResponse) -> Result<Outfit, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_create_outfit(&self, response: HttpResponse) -> Result<Outfit, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_update_outfit(&self, response: HttpResponse) -> Result<Outfit, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_delete_outfit(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse_json::<MessageBody>(response, 200).map(|body| body.message)
    }

    // --- upload ---

    /// A `multipart/form-data` request carrying `file` in the `file` field.
    pub fn build_upload(&self, file: &UploadFile) -> HttpRequest {
        let mut body = Vec::with_capacity(file.bytes.len() + 256);
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                file.file_name.replace('"', "")
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        HttpRequest {
            method: HttpMethod::Post,
            path: self.url("upload"),
            headers: vec![(
                "content-type".to_string(),
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )],
            body: Some(body),
        }
    }

    pub fn parse_upload(&self, response: HttpResponse) -> Result<UploadResponse, ApiError> {
        parse_json(response, 201)
    }
}

fn item_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}", urlencoding::encode(id))
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn error_body(response: &HttpResponse) -> Option<ErrorBody> {
    serde_json::from_str(&response.body).ok()
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    let message = error_body(response).and_then(|body| body.message);
    if response.status == 404 {
        return Err(ApiError::NotFound { message });
    }
    Err(ApiError::Http {
        status: response.status,
        message,
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
