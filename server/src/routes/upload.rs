//! `POST /api/upload`: one image in the multipart `file` field.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use super::error::{ApiError, MessageBody};
use crate::services::ImageFile;
use crate::AppState;

const FILE_FIELD: &str = "file";

/// Pull the `file` field out of the form, if there is one.
async fn read_file(mut multipart: Multipart) -> Result<Option<ImageFile>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        debug!(error = %err, "malformed multipart body");
        ApiError::bad_request("No file uploaded")
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| {
                debug!(error = %err, "failed to read upload field");
                ApiError::bad_request("No file uploaded")
            })?
            .to_vec();
        return Ok(Some(ImageFile {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    let multipart = multipart.map_err(|err| {
        debug!(error = %err, "upload without multipart body");
        ApiError::bad_request("No file uploaded")
    })?;
    let file = read_file(multipart)
        .await?
        .ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    if !file.is_image() {
        return Err(ApiError::bad_request("Only image files are allowed"));
    }

    let hosted = state
        .uploads
        .upload(file)
        .await
        .map_err(|err| ApiError::internal("Failed to upload image", &err))?;

    let data = serde_json::to_value(&hosted).map_err(|err| ApiError::internal("Failed to upload image", &err))?;
    Ok((
        StatusCode::CREATED,
        Json(MessageBody {
            message: "Upload successful".to_string(),
            data: Some(data),
        }),
    ))
}
