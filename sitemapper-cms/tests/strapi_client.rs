//! The client over a canned transport, as the engine sees it through
//! `ContentSource`.

use std::cell::RefCell;

use rstest::rstest;
use serde_json::{json, Value};
use sitemapper_cms::{
    CollectionEntry, ContentSource, FetchError, Query, SingleLookup, StrapiClient, Transport,
};
use sitemapper_core::{ContentKind, Language};

/// Serves one fixed body for every request to a path.
struct Fixed {
    path: &'static str,
    body: Value,
    seen: RefCell<Vec<Query>>,
}

impl Fixed {
    fn new(path: &'static str, body: Value) -> Self {
        Self {
            path,
            body,
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for Fixed {
    fn get_json(&self, path: &str, query: &Query) -> Result<Value, FetchError> {
        self.seen.borrow_mut().push(query.clone());
        if path == self.path {
            Ok(self.body.clone())
        } else {
            Err(FetchError::Status {
                url: path.to_string(),
                status: 404,
                body: "Not Found".to_string(),
            })
        }
    }
}

#[rstest]
#[case::v4(json!({
    "data": [
        { "id": 1, "attributes": { "slug": "launch", "updatedAt": "2026-04-01T12:00:00.000Z", "locale": "fr" } },
        { "id": 2, "attributes": { "slug": null, "updatedAt": "2026-03-01T12:00:00.000Z", "locale": "fr" } }
    ],
    "meta": { "pagination": { "page": 1, "pageSize": 100, "pageCount": 1, "total": 2 } }
}))]
#[case::v5(json!({
    "data": [
        { "id": 1, "documentId": "d1", "slug": "launch", "updatedAt": "2026-04-01T12:00:00.000Z", "locale": "fr" },
        { "id": 2, "documentId": "d2", "updatedAt": "2026-03-01T12:00:00.000Z", "locale": "fr" }
    ],
    "meta": { "pagination": { "page": 1, "pageSize": 100, "pageCount": 1, "total": 2 } }
}))]
fn collection_listing_shapes(#[case] body: Value) {
    let transport = Fixed::new("/api/news-articles", body);
    let client = StrapiClient::new(&transport, 100);
    let kind = ContentKind::collection("news-articles", "news");

    let entries = client
        .collection(&kind, &Language::from("fr"), None)
        .expect("collection");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].slug.as_deref(), Some("launch"));
    assert_eq!(entries[0].id.as_deref(), Some("1"));
    assert_eq!(entries[1].slug, None);
    let locale = transport.seen.borrow()[0]
        .iter()
        .find(|(k, _)| k == "locale")
        .map(|(_, v)| v.clone());
    assert_eq!(locale.as_deref(), Some("fr"));
}

#[test]
fn unknown_single_endpoint_is_not_found() {
    let transport = Fixed::new("/api/about-page", json!({ "data": null }));
    let client = StrapiClient::new(&transport, 100);
    let kind = ContentKind::single("privacy-policy", "privacy");

    let lookup = client.single(&kind, &Language::from("en")).expect("lookup");
    assert_eq!(lookup, SingleLookup::NotFound);
}

#[test]
fn unknown_collection_endpoint_is_an_error() {
    let transport = Fixed::new("/api/about-page", json!({ "data": [] }));
    let client = StrapiClient::new(&transport, 100);
    let kind = ContentKind::collection("reports", "reports");

    let err = client
        .collection(&kind, &Language::from("en"), None)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn collection_entry_constructor_sets_slug_and_timestamp() {
    let ts = chrono::DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
        .expect("ts")
        .with_timezone(&chrono::Utc);
    let entry = CollectionEntry::new("a", ts);
    assert_eq!(entry.slug.as_deref(), Some("a"));
    assert_eq!(entry.updated_at, Some(ts));
    assert_eq!(entry.id, None);
}
