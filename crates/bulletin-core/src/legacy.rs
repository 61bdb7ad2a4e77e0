//! Normalization of documents exported from the legacy document store.
//!
//! Historical snapshots disagree on field names (`imageUrl` vs `image`,
//! `videoUrl` vs `video`) and on how ids and timestamps are encoded (plain
//! strings vs extended-JSON `{"$oid": ...}` / `{"$date": ...}` wrappers).
//! [`LegacyNewsDocument`] accepts all of them and [`LegacyNewsDocument::into_record`]
//! is the only place where they are mapped onto [`NewsRecord`].

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{NewsId, NewsRecord, validate_text_fields};

/// A news document as found in a legacy export.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyNewsDocument {
    #[serde(rename = "_id", alias = "id")]
    id: LegacyId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "imageUrl")]
    image_url: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, rename = "videoUrl")]
    video_url: Option<String>,
    #[serde(default)]
    video: Option<String>,
    #[serde(default, rename = "createdAt")]
    created_at: Option<LegacyDate>,
    #[serde(default, rename = "updatedAt")]
    updated_at: Option<LegacyDate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LegacyId {
    Plain(String),
    Extended {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LegacyDate {
    Text(String),
    Millis(i64),
    Extended {
        #[serde(rename = "$date")]
        date: Box<LegacyDate>,
    },
    NumberLong {
        #[serde(rename = "$numberLong")]
        value: String,
    },
}

impl LegacyDate {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Text(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Self::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            Self::Extended { date } => date.to_datetime(),
            Self::NumberLong { value } => value
                .parse::<i64>()
                .ok()
                .and_then(DateTime::from_timestamp_millis),
        }
    }
}

impl LegacyNewsDocument {
    /// Map the document onto the canonical record shape.
    pub fn into_record(self) -> Result<NewsRecord> {
        let raw_id = match &self.id {
            LegacyId::Plain(s) => s.as_str(),
            LegacyId::Extended { oid } => oid.as_str(),
        };
        let id = NewsId::parse(raw_id)
            .ok_or_else(|| Error::validation(format!("invalid legacy id: {raw_id}")))?;

        let title = self.title.unwrap_or_default();
        let description = self.description.unwrap_or_default();
        validate_text_fields(&title, &description)?;

        let created_at = self
            .created_at
            .as_ref()
            .and_then(LegacyDate::to_datetime)
            .ok_or_else(|| Error::validation(format!("missing or invalid createdAt for {id}")))?;
        let updated_at = self
            .updated_at
            .as_ref()
            .and_then(LegacyDate::to_datetime)
            .unwrap_or(created_at);

        Ok(NewsRecord {
            id,
            title,
            description,
            image_url: first_present(self.image_url, self.image),
            video_url: first_present(self.video_url, self.video),
            created_at,
            updated_at,
        })
    }
}

/// Prefer the newer field name; empty strings count as absent.
fn first_present(preferred: Option<String>, fallback: Option<String>) -> Option<String> {
    preferred
        .filter(|s| !s.trim().is_empty())
        .or_else(|| fallback.filter(|s| !s.trim().is_empty()))
}

/// Parse a legacy export: either a JSON array or newline-delimited JSON.
pub fn parse_legacy_export(text: &str) -> Result<Vec<LegacyNewsDocument>> {
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }

    let mut docs = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let doc = serde_json::from_str(line)
            .map_err(|e| Error::validation(format!("line {}: {e}", idx + 1)))?;
        docs.push(doc);
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(json: &str) -> Result<NewsRecord> {
        let doc: LegacyNewsDocument = serde_json::from_str(json)?;
        doc.into_record()
    }

    #[test]
    fn maps_image_url_schema() {
        let record = parse_one(
            r#"{"_id":"64b7f0c2a1d3e4f5a6b7c8d9","title":"T","description":"D",
                "imageUrl":"/uploads/1-a.jpg","videoUrl":"https://youtu.be/x",
                "createdAt":"2024-01-01T00:00:00.000Z","updatedAt":"2024-01-02T00:00:00.000Z","__v":0}"#,
        )
        .unwrap();
        assert_eq!(record.id.as_str(), "64b7f0c2a1d3e4f5a6b7c8d9");
        assert_eq!(record.image_url.as_deref(), Some("/uploads/1-a.jpg"));
        assert_eq!(record.video_url.as_deref(), Some("https://youtu.be/x"));
        assert_eq!(record.created_at.timestamp(), 1_704_067_200);
        assert_eq!(record.updated_at.timestamp(), 1_704_153_600);
    }

    #[test]
    fn maps_image_schema_with_extended_json() {
        let record = parse_one(
            r#"{"_id":{"$oid":"64b7f0c2a1d3e4f5a6b7c8d9"},"title":"T","description":"D",
                "image":"https://res.example.com/a.jpg","video":"",
                "createdAt":{"$date":"2024-01-01T00:00:00Z"}}"#,
        )
        .unwrap();
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://res.example.com/a.jpg")
        );
        assert_eq!(record.video_url, None);
        assert_eq!(record.updated_at, record.created_at);
    }

    #[test]
    fn accepts_millisecond_dates() {
        let record = parse_one(
            r#"{"_id":"64b7f0c2a1d3e4f5a6b7c8d9","title":"T","description":"D",
                "createdAt":{"$date":{"$numberLong":"1704067200000"}},
                "updatedAt":{"$date":1704067201000}}"#,
        )
        .unwrap();
        assert_eq!(record.created_at.timestamp(), 1_704_067_200);
        assert_eq!(record.updated_at.timestamp(), 1_704_067_201);
    }

    #[test]
    fn prefers_image_url_over_image() {
        let record = parse_one(
            r#"{"_id":"64b7f0c2a1d3e4f5a6b7c8d9","title":"T","description":"D",
                "imageUrl":"/uploads/new.jpg","image":"/uploads/old.jpg",
                "createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(record.image_url.as_deref(), Some("/uploads/new.jpg"));
    }

    #[test]
    fn rejects_missing_title() {
        let err = parse_one(
            r#"{"_id":"64b7f0c2a1d3e4f5a6b7c8d9","description":"D","createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn rejects_missing_created_at() {
        let err = parse_one(r#"{"_id":"64b7f0c2a1d3e4f5a6b7c8d9","title":"T","description":"D"}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn rejects_malformed_id() {
        let err = parse_one(
            r#"{"_id":"nope","title":"T","description":"D","createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid legacy id"));
    }

    #[test]
    fn parse_export_as_array() {
        let docs = parse_legacy_export(
            r#"[{"_id":"64b7f0c2a1d3e4f5a6b7c8d9","title":"T","description":"D","createdAt":"2024-01-01T00:00:00Z"}]"#,
        )
        .unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn parse_export_as_lines_skips_blanks() {
        let text = concat!(
            r#"{"_id":"64b7f0c2a1d3e4f5a6b7c8d9","title":"A","description":"D","createdAt":"2024-01-01T00:00:00Z"}"#,
            "\n\n",
            r#"{"_id":"64b7f0c2a1d3e4f5a6b7c8da","title":"B","description":"D","createdAt":"2024-01-02T00:00:00Z"}"#,
            "\n"
        );
        let docs = parse_legacy_export(text).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn parse_export_reports_line_number() {
        let text = "{\"_id\":\"64b7f0c2a1d3e4f5a6b7c8d9\"}\n{broken";
        let err = parse_legacy_export(text).unwrap_err();
        assert!(err.to_string().starts_with("line 2:"));
    }
}
