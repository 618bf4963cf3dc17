//! Error responses for the HTTP layer.
//!
//! # Design
//! Every failure leaves the handler as an `ApiError` carrying the status and
//! the client-facing message. Infrastructure errors are logged where they are
//! converted and only the fixed message reaches the client.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error};

use crate::store::StoreError;

/// JSON body shared by errors and plain acknowledgements.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: MessageBody,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: MessageBody::new(message),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: MessageBody::new(message),
        }
    }

    /// 404 for a collection with nothing in it, with `data: []`.
    pub fn empty_collection(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: MessageBody {
                message: message.into(),
                data: Some(serde_json::Value::Array(Vec::new())),
            },
        }
    }

    /// Log `err` and answer 500 with `message`.
    pub fn internal(message: &str, err: &dyn std::error::Error) -> Self {
        error!(error = %err, "{message}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: MessageBody::new(message),
        }
    }

    /// Schema violations are the client's fault; anything else is a 500.
    pub fn from_store(message: &str, err: StoreError) -> Self {
        match err {
            StoreError::Validation(schema) => {
                debug!(error = %schema, "document failed schema validation");
                Self::bad_request(format!("Validation failed: {schema}"))
            }
            other => Self::internal(message, &other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection, "rejected request body");
        Self::bad_request("Invalid JSON body")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SchemaError;

    #[test]
    fn schema_errors_become_bad_requests() {
        let err = ApiError::from_store("Failed", StoreError::Validation(SchemaError::new("title", "is required")));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.message, "Validation failed: title is required");
    }

    #[test]
    fn infrastructure_errors_hide_details() {
        let io = std::io::Error::other("disk on fire");
        let err = ApiError::from_store("Failed to fetch apparel item", StoreError::Io(io));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.message, "Failed to fetch apparel item");
    }

    #[test]
    fn empty_collection_carries_empty_data() {
        let err = ApiError::empty_collection("No outfits were found");
        let json = serde_json::to_value(&err.body).unwrap();
        assert_eq!(json, serde_json::json!({"message": "No outfits were found", "data": []}));
    }
}
