//! Image upload to a third-party host.
//!
//! # Design
//! The route hands over the raw file; this service turns it into a base64
//! data URL and delegates the network call to an `ImageHost`. Any failure,
//! including a host reply without `secure_url`, comes back as an
//! `UploadError`. There is no retry.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// An uploaded file as received from the multipart form.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

/// Where the host put the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedImage {
    pub secure_url: String,
    pub public_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error uploading to image host: {reason}")]
pub struct UploadError {
    reason: String,
}

impl UploadError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// A third-party image host.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Store `data_url` under `folder`. The returned `secure_url` may be
    /// empty if the host answered without one; the caller checks.
    async fn upload(&self, data_url: String, folder: &str) -> Result<HostedImage, UploadError>;
}

#[derive(Clone)]
pub struct UploadService {
    host: Arc<dyn ImageHost>,
    folder: String,
}

impl UploadService {
    pub fn new(host: Arc<dyn ImageHost>, folder: impl Into<String>) -> Self {
        Self {
            host,
            folder: folder.into(),
        }
    }

    pub async fn upload(&self, file: ImageFile) -> Result<HostedImage, UploadError> {
        let size = file.bytes.len();
        let hosted = self.host.upload(file.to_data_url(), &self.folder).await?;
        if hosted.secure_url.is_empty() {
            return Err(UploadError::new("response is missing secure_url"));
        }
        info!(public_id = %hosted.public_id, size, folder = %self.folder, "image uploaded");
        Ok(hosted)
    }
}
