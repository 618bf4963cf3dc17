//! `/api/outfit` and `/api/outfit/{id}` handlers. Reads return populated
//! outfits; create and update return the stored ids.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use super::apparel::MISSING_FIELDS;
use super::error::{ApiError, MessageBody};
use crate::models::{CreateOutfit, NewOutfit, Outfit, PopulatedOutfit, UpdateOutfit};
use crate::AppState;

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(format!("Outfit with ID {id} not found"))
}

/// Title, the three non-coat references and the tag list must be present.
pub fn validate_new(input: CreateOutfit) -> Result<NewOutfit, ApiError> {
    let required = |value: Option<String>| value.filter(|v| !v.is_empty());
    let (Some(title), Some(top_id), Some(bottom_id), Some(shoes_id), Some(tags)) = (
        required(input.title),
        required(input.top_id),
        required(input.bottom_id),
        required(input.shoes_id),
        input.tags,
    ) else {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };
    Ok(NewOutfit {
        title,
        description: input.description.filter(|d| !d.is_empty()),
        top_id,
        bottom_id,
        shoes_id,
        coat_id: required(input.coat_id),
        tags,
    })
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PopulatedOutfit>>, ApiError> {
    let outfits = state
        .outfits
        .list()
        .await
        .map_err(|err| ApiError::internal("Error fetching outfits", &err))?;
    if outfits.is_empty() {
        return Err(ApiError::empty_collection("No outfits were found"));
    }
    Ok(Json(outfits))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateOutfit>, JsonRejection>,
) -> Result<(StatusCode, Json<Outfit>), ApiError> {
    let Json(input) = body?;
    let new = validate_new(input)?;
    let created = state
        .outfits
        .create(new)
        .await
        .map_err(|err| ApiError::from_store("Failed to create outfit", err))?;
    info!(id = %created.id, "outfit created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PopulatedOutfit>, ApiError> {
    state
        .outfits
        .get(&id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch outfit", &err))?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateOutfit>, JsonRejection>,
) -> Result<Json<Outfit>, ApiError> {
    let Json(patch) = body?;
    state
        .outfits
        .update(&id, patch)
        .await
        .map_err(|err| ApiError::from_store("Failed to update outfit", err))?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    state
        .outfits
        .delete(&id)
        .await
        .map_err(|err| ApiError::internal("Failed to delete outfit", &err))?
        .ok_or_else(|| not_found(&id))?;
    info!(%id, "outfit deleted");
    Ok(Json(MessageBody::new(format!("Outfit with ID {id} deleted successfully"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> CreateOutfit {
        serde_json::from_value(serde_json::json!({
            "title": "Monday",
            "topID": "t",
            "bottomID": "b",
            "shoesID": "s",
            "tags": ["work"],
            "description": ""
        }))
        .unwrap()
    }

    #[test]
    fn coat_and_description_are_optional() {
        let new = validate_new(full()).unwrap();
        assert!(new.coat_id.is_none());
        assert!(new.description.is_none());
        assert_eq!(new.tags, vec!["work"]);
    }

    #[test]
    fn missing_shoes_is_rejected() {
        let mut input = full();
        input.shoes_id = None;
        let err = validate_new(input).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.body.message.contains("required fields"));
    }

    #[test]
    fn missing_tags_is_rejected() {
        let mut input = full();
        input.tags = None;
        assert!(validate_new(input).is_err());
    }
}
