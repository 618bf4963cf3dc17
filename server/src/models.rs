//! Stored documents and request payloads for the wardrobe API.
//!
//! # Design
//! `Apparel` and `Outfit` are the documents persisted by the store. Field
//! names on the wire follow the web client's camelCase schema (`pictureURL`,
//! `topID`, `createdAt`), so each struct carries explicit serde renames.
//! Request payloads keep every field optional: required-field and enum checks
//! happen in the route layer, which needs to answer 400 with a message rather
//! than letting the JSON extractor reject the body.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Document, SchemaError};

/// Category of an apparel item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

    pub fn as_str(self) -> &'static str {
        match self {
            ApparelType::Top => "TOP",
            ApparelType::Bottom => "BOTTOM",
            ApparelType::Shoes => "SHOES",
            ApparelType::Coat => "COAT",
        }
    }
}

impl fmt::Display for ApparelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the four apparel categories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid apparel type. Must be one of: TOP, BOTTOM, SHOES, COAT")]
pub struct InvalidApparelType;

impl FromStr for ApparelType {
    type Err = InvalidApparelType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApparelType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(InvalidApparelType)
    }
}

/// A single clothing item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
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

impl Document for Apparel {
    const COLLECTION: &'static str = "apparel";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn validate(&self) -> Result<(), SchemaError> {
        require("title", &self.title)?;
        require("pictureURL", &self.picture_url)
    }
}

/// A named combination of apparel references, stored with raw ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub id: String,
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
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Outfit {
    /// The apparel ids this outfit points at, coat last when present.
    pub fn apparel_ids(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.top_id.as_str()),
            Some(self.bottom_id.as_str()),
            Some(self.shoes_id.as_str()),
            self.coat_id.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

impl Document for Outfit {
    const COLLECTION: &'static str = "outfits";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn validate(&self) -> Result<(), SchemaError> {
        require("title", &self.title)?;
        require("topID", &self.top_id)?;
        require("bottomID", &self.bottom_id)?;
        require("shoesID", &self.shoes_id)?;
        if self.tags.iter().any(|tag| tag.is_empty()) {
            return Err(SchemaError::new("tags", "every tag must be a non-empty string"));
        }
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), SchemaError> {
    if value.is_empty() {
        return Err(SchemaError::new(field, "is required"));
    }
    Ok(())
}

/// An outfit as returned by reads: each reference replaced by the apparel
/// document it names. References that do not resolve are left out.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedOutfit {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "topID", skip_serializing_if = "Option::is_none")]
    pub top: Option<Apparel>,
    #[serde(rename = "bottomID", skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Apparel>,
    #[serde(rename = "shoesID", skip_serializing_if = "Option::is_none")]
    pub shoes: Option<Apparel>,
    #[serde(rename = "coatID", skip_serializing_if = "Option::is_none")]
    pub coat: Option<Apparel>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/apparel`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateApparel {
    pub title: Option<String>,
    #[serde(rename = "pictureURL")]
    pub picture_url: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Body of `PUT /api/apparel/:id`. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateApparel {
    pub title: Option<String>,
    #[serde(rename = "pictureURL")]
    pub picture_url: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Validated apparel fields handed to the service.
#[derive(Debug, Clone)]
pub struct NewApparel {
    pub title: String,
    pub picture_url: String,
    pub description: Option<String>,
    pub kind: ApparelType,
}

/// Validated partial apparel update.
#[derive(Debug, Clone, Default)]
pub struct ApparelPatch {
    pub title: Option<String>,
    pub picture_url: Option<String>,
    pub description: Option<String>,
    pub kind: Option<ApparelType>,
}

/// Body of `POST /api/outfit`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateOutfit {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "topID")]
    pub top_id: Option<String>,
    #[serde(rename = "bottomID")]
    pub bottom_id: Option<String>,
    #[serde(rename = "shoesID")]
    pub shoes_id: Option<String>,
    #[serde(rename = "coatID")]
    pub coat_id: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Body of `PUT /api/outfit/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOutfit {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "topID")]
    pub top_id: Option<String>,
    #[serde(rename = "bottomID")]
    pub bottom_id: Option<String>,
    #[serde(rename = "shoesID")]
    pub shoes_id: Option<String>,
    #[serde(rename = "coatID")]
    pub coat_id: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Validated outfit fields handed to the service.
#[derive(Debug, Clone)]
pub struct NewOutfit {
    pub title: String,
    pub description: Option<String>,
    pub top_id: String,
    pub bottom_id: String,
    pub shoes_id: String,
    pub coat_id: Option<String>,
    pub tags: Vec<String>,
}

impl UpdateApparel {
    /// Resolve the raw `type` string; everything else passes through.
    pub fn into_patch(self) -> Result<ApparelPatch, InvalidApparelType> {
        let kind = self.kind.as_deref().map(str::parse::<ApparelType>).transpose()?;
        Ok(ApparelPatch {
            title: self.title,
            picture_url: self.picture_url,
            description: self.description,
            kind,
        })
    }
}
