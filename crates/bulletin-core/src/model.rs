//! The news record and its identifier.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Length of a legacy document id (12 bytes, hex encoded).
const LEGACY_ID_LEN: usize = 24;

/// Public lookup key of a news record.
///
/// New records get a random UUID. Records imported from the legacy document
/// store keep their original 24-character hex id so that previously shared
/// links keep resolving.
///
/// Deserialization goes through [`NewsId::parse`], so malformed ids are
/// rejected and accepted ones come out in canonical lowercase form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NewsId(String);

impl NewsId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an identifier supplied by a client.
    ///
    /// Returns `None` when the input is neither a UUID nor a legacy hex id.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(uuid) = Uuid::try_parse(input) {
            return Some(Self(uuid.hyphenated().to_string()));
        }
        if input.len() == LEGACY_ID_LEN && input.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Some(Self(input.to_ascii_lowercase()));
        }
        None
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for NewsId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid news id: {raw:?}")))
    }
}

impl fmt::Display for NewsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted news item.
///
/// Media references are either host-relative paths (local uploads) or
/// absolute URLs (remote media host, or a video link supplied verbatim).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRecord {
    pub id: NewsId,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a record, after media has been ingested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNews {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

impl NewNews {
    /// Check that the required text fields are present.
    pub fn validate(&self) -> Result<()> {
        validate_text_fields(&self.title, &self.description)
    }
}

/// Title and description must both contain something other than whitespace.
pub fn validate_text_fields(title: &str, description: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::validation("Title is required"));
    }
    if description.trim().is_empty() {
        return Err(Error::validation("Description is required"));
    }
    Ok(())
}
