//! Domain DTOs for the wardrobe API.
//!
//! # Design
//! These types mirror the server's JSON schema but are defined independently
//! of the server crate. The integration tests catch any drift between the two.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of an apparel item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApparelType {
    Top,
    Bottom,
    Shoes,
    Coat,
}

impl ApparelType {
    pub const ALL: [ApparelType; 4] = [
        ApparelType::Top,
        ApparelType::Bottom,
        ApparelType::Shoes,
        ApparelType::Coat,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ApparelType::Top => "top",
            ApparelType::Bottom => "bottom",
            ApparelType::Shoes => "shoes",
            ApparelType::Coat => "coat",
        }
    }
}

impl fmt::Display for ApparelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single apparel item returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apparel {
    pub id: String,
    pub title: String,
    #[serde(rename = "pictureURL")]
    pub picture_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ApparelType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An outfit's reference to an apparel item: the populated document on
/// reads, the bare id on create/update responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApparelRef {
    Populated(Apparel),
    Id(String),
}

impl ApparelRef {
    pub fn id(&self) -> &str {
        match self {
            ApparelRef::Populated(apparel) => &apparel.id,
            ApparelRef::Id(id) => id,
        }
    }

    pub fn apparel(&self) -> Option<&Apparel> {
        match self {
            ApparelRef::Populated(apparel) => Some(apparel),
            ApparelRef::Id(_) => None,
        }
    }
}

/// An outfit returned by the API. A reference the server could not resolve
/// is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "topID", default, skip_serializing_if = "Option::is_none")]
    pub top: Option<ApparelRef>,
    #[serde(rename = "bottomID", default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<ApparelRef>,
    #[serde(rename = "shoesID", default, skip_serializing_if = "Option::is_none")]
    pub shoes: Option<ApparelRef>,
    #[serde(rename = "coatID", default, skip_serializing_if = "Option::is_none")]
    pub coat: Option<ApparelRef>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating an apparel item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateApparel {
    pub title: String,
    #[serde(rename = "pictureURL")]
    pub picture_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ApparelType,
}

/// Request payload for updating an apparel item. Only present fields are
/// applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateApparel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "pictureURL", skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ApparelType>,
}

/// Request payload for creating an outfit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOutfit {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "topID")]
    pub top_id: String,
    #[serde(rename = "bottomID")]
    pub bottom_id: String,
    #[serde(rename = "shoesID")]
    pub shoes_id: String,
    #[serde(rename = "coatID", default, skip_serializing_if = "Option::is_none")]
    pub coat_id: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutfit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "topID", skip_serializing_if = "Option::is_none")]
    pub top_id: Option<String>,
    #[serde(rename = "bottomID", skip_serializing_if = "Option::is_none")]
    pub bottom_id: Option<String>,
    #[serde(rename = "shoesID", skip_serializing_if = "Option::is_none")]
    pub shoes_id: Option<String>,
    #[serde(rename = "coatID", skip_serializing_if = "Option::is_none")]
    pub coat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A file picked by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Body of a successful upload. Fields stay optional so the caller can
/// report exactly what was missing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<UploadedImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedImage {
    #[serde(default)]
    pub secure_url: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
}

/// `{message}` body used for acknowledgements and errors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageBody {
    pub message: String,
}
