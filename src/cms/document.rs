//! Raw CMS documents and search responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document as returned by the content repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Repository-wide document id
    #[serde(default)]
    pub id: String,

    /// Human-readable identifier, unique per document type
    #[serde(default)]
    pub uid: Option<String>,

    /// Custom type name (e.g. `posts`)
    #[serde(rename = "type", default)]
    pub doc_type: String,

    #[serde(default, with = "timestamp")]
    pub first_publication_date: Option<DateTime<Utc>>,

    #[serde(default, with = "timestamp")]
    pub last_publication_date: Option<DateTime<Utc>>,

    /// Typed fields authored in the CMS
    #[serde(default)]
    pub data: serde_json::Value,
}

/// One page of query results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub page: u32,
    pub results_per_page: u32,
    pub results_size: u32,
    pub total_results_size: u32,
    pub total_pages: u32,
    pub next_page: Option<String>,
    pub prev_page: Option<String>,
    pub results: Vec<Document>,
}

/// Parse a CMS timestamp.
///
/// Accepts RFC 3339 as well as the colon-less offset form the Prismic API
/// emits (`2021-03-25T19:25:28+0000`).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|date| date.with_timezone(&Utc))
}

/// Serde adapter for optional CMS timestamps. Unparseable values become
/// `None` so one bad field never rejects a whole response.
mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => {
                serializer.serialize_str(&date.format("%Y-%m-%dT%H:%M:%S%z").to_string())
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|value| match super::parse_timestamp(&value) {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!("Ignoring unparseable timestamp {:?}: {}", value, e);
                None
            }
        }))
    }
}
