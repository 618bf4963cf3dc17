//! Cloudinary implementation of `ImageHost`.
//!
//! # Design
//! Uploads are signed: the request parameters are sorted, joined as
//! `key=value&...`, suffixed with the API secret and hashed with SHA-256.
//! Provider errors arrive as `{error: {message}}` and become `UploadError`s.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::warn;

use super::upload::{HostedImage, ImageHost, UploadError};
use crate::config::ImageHostConfig;

/// Signed uploads to the Cloudinary upload API.
#[derive(Clone)]
pub struct CloudinaryHost {
    http: reqwest::Client,
    config: ImageHostConfig,
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    secure_url: Option<String>,
    public_id: Option<String>,
    error: Option<ReplyError>,
}

#[derive(Debug, Deserialize)]
struct ReplyError {
    message: String,
}

impl CloudinaryHost {
    pub fn new(config: ImageHostConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

/// Hex SHA-256 over the `&`-joined, key-sorted params followed by the secret.
pub fn sign(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by_key(|(key, _)| *key);
    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha256::digest(format!("{joined}{secret}").as_bytes()))
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, data_url: String, folder: &str) -> Result<HostedImage, UploadError> {
        if !self.config.has_credentials() {
            return Err(UploadError::new("image host credentials are not configured"));
        }

        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("folder", folder), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );
        let form = [
            ("file", data_url.as_str()),
            ("folder", folder),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];

        let response = self.http.post(self.endpoint()).form(&form).send().await?;
        let status = response.status();
        let reply: UploadReply = response.json().await?;

        if let Some(error) = reply.error {
            warn!(%status, message = %error.message, "image host rejected upload");
            return Err(UploadError::new(error.message));
        }
        if !status.is_success() {
            return Err(UploadError::new(format!("image host answered {status}")));
        }
        Ok(HostedImage {
            secure_url: reply.secure_url.unwrap_or_default(),
            public_id: reply.public_id.unwrap_or_default(),
        })
    }
}
