//! `/api/apparel` and `/api/apparel/{id}` handlers.
//!
//! # Design
//! Required fields and the `type` enum are checked here, before the service
//! is called, so a 400 never touches the store. Service errors collapse to a
//! fixed 500 message; the real error only reaches the log.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use super::error::{ApiError, MessageBody};
use crate::models::{Apparel, ApparelType, CreateApparel, NewApparel, UpdateApparel};
use crate::AppState;

pub const MISSING_FIELDS: &str = "Missing required fields, please check the information in the body";

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(format!("Apparel with ID {id} not found"))
}

/// Required-field and enum checks for a new item, done before any store access.
pub fn validate_new(input: CreateApparel) -> Result<NewApparel, ApiError> {
    let required = |value: Option<String>| value.filter(|v| !v.is_empty());
    let (Some(title), Some(picture_url), Some(kind)) = (
        required(input.title),
        required(input.picture_url),
        required(input.kind),
    ) else {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };
    let kind = kind
        .parse::<ApparelType>()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;
    Ok(NewApparel {
        title,
        picture_url,
        description: input.description.filter(|d| !d.is_empty()),
        kind,
    })
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Apparel>>, ApiError> {
    let items = state
        .apparel
        .list()
        .await
        .map_err(|err| ApiError::internal("Failed to fetch apparel items", &err))?;
    if items.is_empty() {
        return Err(ApiError::empty_collection("No apparel items were found"));
    }
    Ok(Json(items))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateApparel>, JsonRejection>,
) -> Result<(StatusCode, Json<Apparel>), ApiError> {
    let Json(input) = body?;
    let new = validate_new(input)?;
    let created = state
        .apparel
        .create(new)
        .await
        .map_err(|err| ApiError::from_store("Failed to create Apparel item", err))?;
    info!(id = %created.id, kind = %created.kind, "apparel created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Apparel>, ApiError> {
    state
        .apparel
        .get(&id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch apparel item", &err))?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateApparel>, JsonRejection>,
) -> Result<Json<Apparel>, ApiError> {
    let Json(input) = body?;
    let patch = input
        .into_patch()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;
    state
        .apparel
        .update(&id, patch)
        .await
        .map_err(|err| ApiError::from_store("Failed to update apparel item", err))?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    state
        .apparel
        .delete(&id)
        .await
        .map_err(|err| ApiError::internal("Failed to delete apparel item", &err))?
        .ok_or_else(|| not_found(&id))?;
    info!(%id, "apparel deleted");
    Ok(Json(MessageBody::new(format!("Apparel with ID {id} deleted successfully"))))
}
