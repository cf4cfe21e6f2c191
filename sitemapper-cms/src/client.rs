//! Strapi REST client: paginated collection listings and single-kind lookups.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;

use sitemapper_core::Language;

use crate::error::FetchError;
use crate::records::{CollectionEntry, ListResponse, SingleEntry, SingleLookup, SingleResponse};
use crate::transport::{Query, Transport};

/// Fetches sitemap-relevant fields from a Strapi instance.
#[derive(Debug)]
pub struct StrapiClient<T> {
    transport: T,
    page_size: u32,
}

impl<T: Transport> StrapiClient<T> {
    pub fn new(transport: T, page_size: u32) -> Self {
        Self {
            transport,
            page_size: page_size.max(1),
        }
    }

    /// Every live entry of a collection for one locale, newest first,
    /// optionally only those modified strictly after `since`.
    ///
    /// Pages are requested until the page count reported with the first page
    /// is exhausted or a page comes back empty.
    pub fn fetch_collection(
        &self,
        api_slug: &str,
        language: &Language,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<CollectionEntry>, FetchError> {
        match since {
            Some(ts) => tracing::info!(
                "fetching collection {api_slug} ({language}) since {}",
                ts.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
            None => tracing::info!("fetching collection {api_slug} ({language}) (full fetch)"),
        }

        let path = format!("/api/{api_slug}");
        let mut entries = Vec::new();
        let mut page = 1u32;
        let mut page_count = 1u32;

        loop {
            let query = self.collection_query(language, since, page);
            let response: ListResponse = self.get(&path, &query)?;
            if page == 1 {
                page_count = response.page_count().unwrap_or(1);
            }
            let Some(data) = response.data.filter(|d| !d.is_empty()) else {
                break;
            };
            tracing::debug!(
                "fetched page {page}/{page_count} for {api_slug} ({language}) - {} items",
                data.len()
            );
            entries.extend(data.into_iter().map(|raw| raw.into_collection_entry()));
            page += 1;
            if page > page_count {
                break;
            }
        }

        tracing::info!(
            "finished fetching collection {api_slug} ({language}): {} entries",
            entries.len()
        );
        Ok(entries)
    }

    /// The published record of a single kind for one locale.
    ///
    /// A 404, a `null` payload and an unpublished record all map to
    /// [`SingleLookup::NotFound`].
    pub fn fetch_single(
        &self,
        api_slug: &str,
        language: &Language,
    ) -> Result<SingleLookup, FetchError> {
        tracing::debug!("fetching single type {api_slug} ({language})");
        let path = format!("/api/{api_slug}");
        let query = single_query(language);

        let response: SingleResponse = match self.get(&path, &query) {
            Ok(response) => response,
            Err(err) if err.is_not_found() => {
                tracing::info!("single type {api_slug} ({language}) not found (404)");
                return Ok(SingleLookup::NotFound);
            }
            Err(err) => return Err(err),
        };

        match response.data {
            Some(raw) if raw.is_published() => Ok(SingleLookup::Found(raw.into_single_entry())),
            _ => {
                tracing::info!("single type {api_slug} ({language}) not found or not published");
                Ok(SingleLookup::NotFound)
            }
        }
    }

    fn get<R: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<R, FetchError> {
        let body = self.transport.get_json(path, query)?;
        serde_json::from_value(body).map_err(|source| FetchError::Decode {
            path: path.to_string(),
            source,
        })
    }

    fn collection_query(
        &self,
        language: &Language,
        since: Option<DateTime<Utc>>,
        page: u32,
    ) -> Query {
        let mut query = vec![
            pair("locale", language.as_str()),
            pair("fields[0]", "slug"),
            pair("fields[1]", "updatedAt"),
            pair("fields[2]", "locale"),
            pair("pagination[page]", &page.to_string()),
            pair("pagination[pageSize]", &self.page_size.to_string()),
            pair("sort[0]", "updatedAt:desc"),
            pair("publicationState", "live"),
        ];
        if let Some(ts) = since {
            query.push(pair(
                "filters[updatedAt][$gt]",
                &ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            ));
        }
        query
    }
}

fn single_query(language: &Language) -> Query {
    vec![
        pair("locale", language.as_str()),
        pair("fields[0]", "updatedAt"),
        pair("fields[1]", "locale"),
        pair("fields[2]", "publishedAt"),
        pair("publicationState", "live"),
    ]
}

fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}
