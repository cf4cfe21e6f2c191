//! The seam between the reconciliation engine and wherever content lives.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use sitemapper_core::{ContentKind, Language};

use crate::client::StrapiClient;
use crate::error::FetchError;
use crate::records::{CollectionEntry, SingleEntry, SingleLookup};
use crate::transport::Transport;

/// Where the engine gets content from.
///
/// Errors are returned rather than swallowed: the engine decides per step
/// whether a failure means "no data" or "do not prune".
pub trait ContentSource {
    /// Live entries of a collection kind, optionally only those modified
    /// strictly after `since`.
    fn collection(
        &self,
        kind: &ContentKind,
        language: &Language,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<CollectionEntry>, FetchError>;

    /// The published record of a single kind.
    fn single(&self, kind: &ContentKind, language: &Language) -> Result<SingleLookup, FetchError>;
}

impl<T: Transport> ContentSource for StrapiClient<T> {
    fn collection(
        &self,
        kind: &ContentKind,
        language: &Language,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<CollectionEntry>, FetchError> {
        self.fetch_collection(&kind.api_slug, language, since)
    }

    fn single(&self, kind: &ContentKind, language: &Language) -> Result<SingleLookup, FetchError> {
        self.fetch_single(&kind.api_slug, language)
    }
}

impl<S: ContentSource + ?Sized> ContentSource for &S {
    fn collection(
        &self,
        kind: &ContentKind,
        language: &Language,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<CollectionEntry>, FetchError> {
        (**self).collection(kind, language, since)
    }

    fn single(&self, kind: &ContentKind, language: &Language) -> Result<SingleLookup, FetchError> {
        (**self).single(kind, language)
    }
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

type Key = (String, Language);

/// A request observed by [`MemorySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Collection {
        api_slug: String,
        language: Language,
        since: Option<DateTime<Utc>>,
    },
    Single {
        api_slug: String,
        language: Language,
    },
}

/// Content held in memory, keyed by API slug and language.
///
/// Behaves like the CMS for everything the engine can observe: `since`
/// filters strictly after, unknown pairs are empty collections or
/// not-found singles, and pairs marked with [`MemorySource::fail`] return a
/// transport error.
#[derive(Debug, Default)]
pub struct MemorySource {
    collections: HashMap<Key, Vec<CollectionEntry>>,
    singles: HashMap<Key, SingleEntry>,
    failing: HashSet<Key>,
    calls: RefCell<Vec<SourceCall>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a collection entry, matched by slug.
    pub fn put_entry(&mut self, api_slug: &str, language: &str, entry: CollectionEntry) {
        let entries = self.collections.entry(key(api_slug, language)).or_default();
        match entries.iter_mut().find(|e| e.slug == entry.slug) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    pub fn remove_entry(&mut self, api_slug: &str, language: &str, slug: &str) {
        if let Some(entries) = self.collections.get_mut(&key(api_slug, language)) {
            entries.retain(|e| e.slug.as_deref() != Some(slug));
        }
    }

    /// Publish a single-kind record.
    pub fn put_single(&mut self, api_slug: &str, language: &str, updated_at: DateTime<Utc>) {
        self.singles.insert(
            key(api_slug, language),
            SingleEntry {
                id: None,
                updated_at: Some(updated_at),
            },
        );
    }

    /// Unpublish or delete a single-kind record.
    pub fn remove_single(&mut self, api_slug: &str, language: &str) {
        self.singles.remove(&key(api_slug, language));
    }

    /// Make every request for this pair fail until [`MemorySource::recover`].
    pub fn fail(&mut self, api_slug: &str, language: &str) {
        self.failing.insert(key(api_slug, language));
    }

    pub fn recover(&mut self, api_slug: &str, language: &str) {
        self.failing.remove(&key(api_slug, language));
    }

    /// Requests made so far, in order.
    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn check(&self, k: &Key) -> Result<(), FetchError> {
        if self.failing.contains(k) {
            return Err(FetchError::Transport {
                url: format!("memory:/api/{}?locale={}", k.0, k.1),
                message: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

impl ContentSource for MemorySource {
    fn collection(
        &self,
        kind: &ContentKind,
        language: &Language,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<CollectionEntry>, FetchError> {
        self.calls.borrow_mut().push(SourceCall::Collection {
            api_slug: kind.api_slug.clone(),
            language: language.clone(),
            since,
        });
        let k = (kind.api_slug.clone(), language.clone());
        self.check(&k)?;

        let mut entries: Vec<CollectionEntry> = self
            .collections
            .get(&k)
            .into_iter()
            .flatten()
            .filter(|e| match since {
                Some(since) => e.updated_at.is_some_and(|ts| ts > since),
                None => true,
            })
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries)
    }

    fn single(&self, kind: &ContentKind, language: &Language) -> Result<SingleLookup, FetchError> {
        self.calls.borrow_mut().push(SourceCall::Single {
            api_slug: kind.api_slug.clone(),
            language: language.clone(),
        });
        let k = (kind.api_slug.clone(), language.clone());
        self.check(&k)?;

        Ok(match self.singles.get(&k) {
            Some(entry) => SingleLookup::Found(entry.clone()),
            None => SingleLookup::NotFound,
        })
    }
}

fn key(api_slug: &str, language: &str) -> Key {
    (api_slug.to_string(), Language::from(language))
}
