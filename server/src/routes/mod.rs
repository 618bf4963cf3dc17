//! HTTP endpoints under `/api`.

pub mod apparel;
pub mod error;
pub mod outfit;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub use error::{ApiError, MessageBody};

/// Largest accepted upload request, multipart framing included.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/apparel", get(apparel::list).post(apparel::create))
        .route(
            "/apparel/{id}",
            get(apparel::get).put(apparel::update).delete(apparel::delete),
        )
        .route("/outfit", get(outfit::list).post(outfit::create))
        .route(
            "/outfit/{id}",
            get(outfit::get).put(outfit::update).delete(outfit::delete),
        )
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
