//! Wire shapes of Strapi responses and the records handed to the engine.
//!
//! Strapi v4 nests fields under `attributes`; v5 returns them inline. Both
//! are accepted.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// One collection item as needed for a sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionEntry {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CollectionEntry {
    pub fn new(slug: &str, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            slug: Some(slug.to_string()),
            updated_at: Some(updated_at),
        }
    }
}

/// A published single-kind record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleEntry {
    pub id: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Outcome of a single-kind lookup. Unpublished and absent are the same
/// thing to a sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleLookup {
    Found(SingleEntry),
    NotFound,
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EntryFields {
    #[serde(default)]
    slug: Option<String>,
    #[serde(default, rename = "updatedAt")]
    updated_at: Option<String>,
    #[serde(default, rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEntry {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    attributes: Option<EntryFields>,
    #[serde(flatten)]
    inline: EntryFields,
}

impl RawEntry {
    fn fields(&self) -> &EntryFields {
        self.attributes.as_ref().unwrap_or(&self.inline)
    }

    fn id(&self) -> Option<String> {
        match &self.id {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    pub(crate) fn is_published(&self) -> bool {
        self.fields()
            .published_at
            .as_deref()
            .is_some_and(|p| !p.is_empty())
    }

    pub(crate) fn into_collection_entry(self) -> CollectionEntry {
        let fields = self.fields();
        CollectionEntry {
            id: self.id(),
            slug: fields
                .slug
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            updated_at: parse_timestamp(fields.updated_at.as_deref()),
        }
    }

    pub(crate) fn into_single_entry(self) -> SingleEntry {
        SingleEntry {
            id: self.id(),
            updated_at: parse_timestamp(self.fields().updated_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    #[serde(default)]
    pub data: Option<Vec<RawEntry>>,
    #[serde(default)]
    pub meta: Option<ListMeta>,
}

impl ListResponse {
    pub(crate) fn page_count(&self) -> Option<u32> {
        self.meta.as_ref()?.pagination.as_ref()?.page_count
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListMeta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default, rename = "pageCount")]
    pub page_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SingleResponse {
    #[serde(default)]
    pub data: Option<RawEntry>,
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(err) => {
            tracing::debug!("ignoring unparseable updatedAt '{raw}': {err}");
            None
        }
    }
}
