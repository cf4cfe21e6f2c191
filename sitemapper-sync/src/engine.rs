//! Incremental reconciliation engine.
//!
//! A run threads one owned [`UrlSet`] through a fixed sequence of merge
//! steps:
//!
//! 1. [`seed`] from previously written files (incremental mode only)
//! 2. [`refresh_heartbeats`] for `always_refresh` kinds
//! 3. [`apply_collection`] / [`apply_single`] for every language and kind
//! 4. [`confirm_single_missing`] for singles the CMS no longer serves
//! 5. [`prune_collection`] against complete live listings (incremental mode
//!    with a prior timestamp)
//!
//! Each step is a plain function over `&mut UrlSet` so it can be exercised on
//! a synthetic set. [`Reconciler`] wires them to a [`ContentSource`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use sitemapper_cms::{CollectionEntry, ContentSource, SingleEntry, SingleLookup};
use sitemapper_core::{
    format_lastmod, Catalog, ContentKind, Language, Mode, SitemapUrl, UrlBuilder, UrlEntry,
};

use crate::run_state::RunState;
use crate::url_set::{Upsert, UrlSet};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Counters for one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records loaded from existing files.
    pub seeded: usize,
    pub inserted: usize,
    pub updated: usize,
    pub removed: usize,
    /// Records that could not be turned into a URL.
    pub skipped: usize,
    /// Kind/language fetches that failed and were treated as empty.
    pub fetch_failures: usize,
    /// At least one fetch in step 3 returned a record.
    pub fetched_something_new: bool,
}

impl ReconcileReport {
    fn count(&mut self, outcome: Upsert) {
        match outcome {
            Upsert::Inserted => self.inserted += 1,
            Upsert::Updated => self.updated += 1,
            Upsert::Unchanged => {}
        }
    }
}

/// Everything a reconciliation hands back to the pipeline.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub urls: UrlSet,
    pub report: ReconcileReport,
    /// Miss counters to persist for the next run.
    pub single_misses: BTreeMap<String, u32>,
}

// ---------------------------------------------------------------------------
// Record construction
// ---------------------------------------------------------------------------

/// Working record for a location of `kind`. The group comes from the shared
/// classifier so freshly built records land where a later seed would put
/// them.
fn entry_for(
    urls: &UrlBuilder,
    catalog: &Catalog,
    kind: &ContentKind,
    loc: String,
    updated_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> UrlEntry {
    let group = urls.classify(catalog, &loc).group;
    UrlEntry {
        url: SitemapUrl {
            loc,
            lastmod: Some(format_lastmod(updated_at.unwrap_or(now))),
            changefreq: Some(kind.change_frequency),
            priority: Some(kind.priority.clone()),
        },
        group,
    }
}

// ---------------------------------------------------------------------------
// Merge steps
// ---------------------------------------------------------------------------

/// Step 1: add previously persisted records, each keyed by the classifier.
/// Records matching no kind go to the uncategorized group; none are dropped.
pub fn seed(
    set: &mut UrlSet,
    urls: &UrlBuilder,
    catalog: &Catalog,
    records: impl IntoIterator<Item = SitemapUrl>,
) -> usize {
    let mut seeded = 0;
    for url in records {
        let group = urls.classify(catalog, &url.loc).group;
        set.upsert(UrlEntry { url, group });
        seeded += 1;
    }
    seeded
}

/// Step 2: upsert every `always_refresh` kind for every language with
/// `lastmod = now`.
pub fn refresh_heartbeats(
    set: &mut UrlSet,
    urls: &UrlBuilder,
    catalog: &Catalog,
    now: DateTime<Utc>,
    report: &mut ReconcileReport,
) {
    for language in urls.languages().iter() {
        for kind in catalog.iter().filter(|k| k.always_refresh) {
            match urls.url_for(kind, language, None) {
                Ok(loc) => {
                    let outcome = set.upsert(entry_for(urls, catalog, kind, loc, Some(now), now));
                    report.count(outcome);
                }
                Err(err) => {
                    tracing::warn!("skipping heartbeat {} ({language}): {err}", kind.api_slug);
                    report.skipped += 1;
                }
            }
        }
    }
}

/// Step 3 for a collection kind: upsert every entry that has a slug.
/// Returns the locations that were built.
#[allow(clippy::too_many_arguments)]
pub fn apply_collection(
    set: &mut UrlSet,
    urls: &UrlBuilder,
    catalog: &Catalog,
    kind: &ContentKind,
    language: &Language,
    entries: &[CollectionEntry],
    now: DateTime<Utc>,
    report: &mut ReconcileReport,
) -> BTreeSet<String> {
    let mut built = BTreeSet::new();
    for entry in entries {
        let loc = match urls.url_for(kind, language, entry.slug.as_deref()) {
            Ok(loc) => loc,
            Err(err) => {
                tracing::warn!(
                    "skipping {} entry {} ({language}): {err}",
                    kind.api_slug,
                    entry.id.as_deref().unwrap_or("?")
                );
                report.skipped += 1;
                continue;
            }
        };
        built.insert(loc.clone());
        let outcome = set.upsert(entry_for(urls, catalog, kind, loc, entry.updated_at, now));
        report.count(outcome);
    }
    built
}

/// Step 3 for a published single kind.
#[allow(clippy::too_many_arguments)]
pub fn apply_single(
    set: &mut UrlSet,
    urls: &UrlBuilder,
    catalog: &Catalog,
    kind: &ContentKind,
    language: &Language,
    entry: &SingleEntry,
    now: DateTime<Utc>,
    report: &mut ReconcileReport,
) -> Option<String> {
    match urls.url_for(kind, language, None) {
        Ok(loc) => {
            let outcome = set.upsert(entry_for(
                urls,
                catalog,
                kind,
                loc.clone(),
                entry.updated_at,
                now,
            ));
            report.count(outcome);
            Some(loc)
        }
        Err(err) => {
            tracing::warn!("skipping {} ({language}): {err}", kind.api_slug);
            report.skipped += 1;
            None
        }
    }
}

/// Step 4: record a not-found observation for a single-kind location and
/// remove it once `grace` consecutive observations have been seen.
///
/// Locations that are not in the set carry no counter.
pub fn confirm_single_missing(
    set: &mut UrlSet,
    loc: &str,
    misses: &mut BTreeMap<String, u32>,
    grace: u32,
    report: &mut ReconcileReport,
) -> bool {
    if !set.contains(loc) {
        misses.remove(loc);
        return false;
    }
    let seen = misses.entry(loc.to_string()).or_insert(0);
    *seen += 1;
    if *seen < grace.max(1) {
        tracing::info!("{loc} not found ({} of {} before removal)", *seen, grace);
        return false;
    }
    misses.remove(loc);
    set.remove(loc);
    report.removed += 1;
    tracing::info!("removed {loc}: no longer found or published");
    true
}

/// Step 5: drop every record of `kind` in `language` whose location is not
/// in `live`.
pub fn prune_collection(
    set: &mut UrlSet,
    kind: &ContentKind,
    language: &Language,
    live: &BTreeSet<String>,
    report: &mut ReconcileReport,
) -> usize {
    let group = kind.group_key(language);
    let stale: Vec<String> = set
        .locations_in(&group)
        .into_iter()
        .filter(|loc| !live.contains(loc))
        .collect();
    for loc in &stale {
        set.remove(loc);
        tracing::debug!("removed {loc}: not in live {} listing", kind.api_slug);
    }
    report.removed += stale.len();
    stale.len()
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Runs the merge steps against a content source.
pub struct Reconciler<'a, S: ?Sized> {
    source: &'a S,
    urls: &'a UrlBuilder,
    catalog: &'a Catalog,
    single_grace: u32,
    now: DateTime<Utc>,
}

impl<'a, S: ContentSource + ?Sized> Reconciler<'a, S> {
    pub fn new(
        source: &'a S,
        urls: &'a UrlBuilder,
        catalog: &'a Catalog,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            source,
            urls,
            catalog,
            single_grace: 1,
            now,
        }
    }

    /// Consecutive not-found observations before a single-kind URL is removed.
    pub fn with_single_grace(mut self, grace: u32) -> Self {
        self.single_grace = grace.max(1);
        self
    }

    /// Reconcile `seed` (ignored in full mode) with the current CMS content.
    pub fn run(
        &self,
        mode: Mode,
        prior: &RunState,
        seed_records: Vec<SitemapUrl>,
    ) -> ReconcileOutcome {
        let incremental = mode == Mode::Incremental;
        let mut set = UrlSet::new();
        let mut report = ReconcileReport::default();
        let mut misses = if incremental {
            prior.single_misses.clone()
        } else {
            BTreeMap::new()
        };

        if incremental {
            report.seeded = seed(&mut set, self.urls, self.catalog, seed_records);
            tracing::info!("loaded {} existing URLs", report.seeded);
        }

        refresh_heartbeats(&mut set, self.urls, self.catalog, self.now, &mut report);

        let since = if incremental {
            prior.last_successful_run_timestamp
        } else {
            None
        };
        for language in self.urls.languages().iter() {
            for kind in self.catalog.iter().filter(|k| !k.always_refresh) {
                if kind.is_collection() {
                    self.fetch_collection(&mut set, kind, language, since, &mut report);
                } else {
                    self.fetch_single(&mut set, kind, language, incremental, &mut misses, &mut report);
                }
            }
        }

        if incremental && since.is_some() {
            self.prune_collections(&mut set, &mut report);
        }

        // Counters only survive for locations a declared single kind still builds.
        let tracked: BTreeSet<String> = self
            .urls
            .languages()
            .iter()
            .flat_map(|language| {
                self.catalog
                    .iter()
                    .filter(|k| k.is_single() && !k.always_refresh)
                    .filter_map(move |kind| self.urls.url_for(kind, language, None).ok())
            })
            .collect();
        misses.retain(|loc, _| tracked.contains(loc));

        tracing::info!(
            "reconciled {} URLs: {} inserted, {} updated, {} removed, {} skipped",
            set.len(),
            report.inserted,
            report.updated,
            report.removed,
            report.skipped
        );
        ReconcileOutcome {
            urls: set,
            report,
            single_misses: misses,
        }
    }

    fn fetch_collection(
        &self,
        set: &mut UrlSet,
        kind: &ContentKind,
        language: &Language,
        since: Option<DateTime<Utc>>,
        report: &mut ReconcileReport,
    ) {
        match self.source.collection(kind, language, since) {
            Ok(entries) => {
                if !entries.is_empty() {
                    report.fetched_something_new = true;
                }
                apply_collection(
                    set,
                    self.urls,
                    self.catalog,
                    kind,
                    language,
                    &entries,
                    self.now,
                    report,
                );
            }
            Err(err) => {
                tracing::warn!("fetching {} ({language}) failed: {err}", kind.api_slug);
                report.fetch_failures += 1;
            }
        }
    }

    fn fetch_single(
        &self,
        set: &mut UrlSet,
        kind: &ContentKind,
        language: &Language,
        incremental: bool,
        misses: &mut BTreeMap<String, u32>,
        report: &mut ReconcileReport,
    ) {
        match self.source.single(kind, language) {
            Ok(SingleLookup::Found(entry)) => {
                report.fetched_something_new = true;
                if let Some(loc) = apply_single(
                    set,
                    self.urls,
                    self.catalog,
                    kind,
                    language,
                    &entry,
                    self.now,
                    report,
                ) {
                    misses.remove(&loc);
                }
            }
            Ok(SingleLookup::NotFound) if incremental => {
                if let Ok(loc) = self.urls.url_for(kind, language, None) {
                    confirm_single_missing(set, &loc, misses, self.single_grace, report);
                }
            }
            Ok(SingleLookup::NotFound) => {}
            Err(err) => {
                tracing::warn!("fetching {} ({language}) failed: {err}", kind.api_slug);
                report.fetch_failures += 1;
            }
        }
    }

    fn prune_collections(&self, set: &mut UrlSet, report: &mut ReconcileReport) {
        tracing::info!("checking collections for deleted entries");
        for language in self.urls.languages().iter() {
            for kind in self.catalog.collections() {
                let live = match self.source.collection(kind, language, None) {
                    Ok(live) => live,
                    Err(err) => {
                        tracing::warn!(
                            "full listing of {} ({language}) failed, not pruning: {err}",
                            kind.api_slug
                        );
                        report.fetch_failures += 1;
                        continue;
                    }
                };
                let built = apply_collection(
                    set,
                    self.urls,
                    self.catalog,
                    kind,
                    language,
                    &live,
                    self.now,
                    report,
                );
                let removed = prune_collection(set, kind, language, &built, report);
                if removed > 0 {
                    tracing::info!(
                        "removed {removed} deleted {} entries ({language})",
                        kind.api_slug
                    );
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sitemapper_cms::MemorySource;
    use sitemapper_core::{ChangeFrequency, GroupKey, Languages};

    fn t(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, day, 12, 0, 0).unwrap()
    }

    fn builder() -> UrlBuilder {
        UrlBuilder::new("https://example.com", Languages::parse("en,fr").unwrap())
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            ContentKind::single("home-page", "")
                .with_hints("1.0", ChangeFrequency::Daily)
                .heartbeat(),
            ContentKind::single("legal", "legal"),
            ContentKind::collection("blog-posts", "blog"),
        ])
        .unwrap()
    }

    fn fr() -> Language {
        Language::from("fr")
    }

    #[test]
    fn seed_classifies_and_keeps_unknown_locations() {
        let urls = builder();
        let catalog = catalog();
        let mut set = UrlSet::new();
        let n = seed(
            &mut set,
            &urls,
            &catalog,
            vec![
                SitemapUrl::new("https://example.com/fr/blog/bonjour"),
                SitemapUrl::new("https://example.com/careers"),
            ],
        );
        assert_eq!(n, 2);
        assert_eq!(
            set.get("https://example.com/fr/blog/bonjour").map(|e| e.group.clone()),
            Some(GroupKey::new("blog-posts", fr()))
        );
        assert!(set
            .get("https://example.com/careers")
            .is_some_and(|e| e.group.is_uncategorized()));
    }

    #[test]
    fn heartbeats_cover_every_language_with_run_time() {
        let urls = builder();
        let catalog = catalog();
        let mut set = UrlSet::new();
        let mut report = ReconcileReport::default();
        refresh_heartbeats(&mut set, &urls, &catalog, t(3), &mut report);

        assert_eq!(set.len(), 2);
        let root = set.get("https://example.com/").expect("default home");
        assert_eq!(root.url.lastmod.as_deref(), Some("2026-06-03T12:00:00.000Z"));
        assert_eq!(root.url.priority.as_deref(), Some("1.0"));
        assert_eq!(root.group, GroupKey::new("single-home-page", Language::from("en")));
        assert!(set.contains("https://example.com/fr"));
        assert_eq!(report.inserted, 2);
    }

    #[test]
    fn collection_entry_without_slug_is_skipped() {
        let urls = builder();
        let catalog = catalog();
        let kind = catalog.get("blog-posts").unwrap();
        let mut set = UrlSet::new();
        let mut report = ReconcileReport::default();
        let entries = vec![
            CollectionEntry::new("a", t(1)),
            CollectionEntry {
                id: Some("9".into()),
                slug: None,
                updated_at: Some(t(1)),
            },
        ];
        let built = apply_collection(&mut set, &urls, &catalog, kind, &fr(), &entries, t(2), &mut report);
        assert_eq!(built.len(), 1);
        assert_eq!(report.skipped, 1);
        assert!(set.contains("https://example.com/fr/blog/a"));
    }

    #[test]
    fn collection_entry_with_nested_slug_is_skipped() {
        let urls = builder();
        let catalog = catalog();
        let kind = catalog.get("blog-posts").unwrap();
        let mut set = UrlSet::new();
        let mut report = ReconcileReport::default();
        let entries = vec![
            CollectionEntry::new("2024/q1", t(1)),
            CollectionEntry::new("q2", t(1)),
        ];
        let built = apply_collection(&mut set, &urls, &catalog, kind, &fr(), &entries, t(2), &mut report);
        assert_eq!(built, BTreeSet::from(["https://example.com/fr/blog/q2".to_string()]));
        assert_eq!(report.skipped, 1);
        assert!(!set.contains("https://example.com/fr/blog/2024/q1"));
    }

    #[test]
    fn missing_updated_at_falls_back_to_run_time() {
        let urls = builder();
        let catalog = catalog();
        let kind = catalog.get("legal").unwrap();
        let mut set = UrlSet::new();
        let mut report = ReconcileReport::default();
        let entry = SingleEntry {
            id: None,
            updated_at: None,
        };
        apply_single(&mut set, &urls, &catalog, kind, &fr(), &entry, t(9), &mut report);
        assert_eq!(
            set.get("https://example.com/fr/legal")
                .and_then(|e| e.url.lastmod.as_deref()),
            Some("2026-06-09T12:00:00.000Z")
        );
    }

    #[test]
    fn later_write_wins_over_seed() {
        let urls = builder();
        let catalog = catalog();
        let kind = catalog.get("blog-posts").unwrap();
        let mut set = UrlSet::new();
        seed(
            &mut set,
            &urls,
            &catalog,
            vec![SitemapUrl {
                lastmod: Some("2030-01-01T00:00:00.000Z".into()),
                ..SitemapUrl::new("https://example.com/blog/a")
            }],
        );
        let mut report = ReconcileReport::default();
        apply_collection(
            &mut set,
            &urls,
            &catalog,
            kind,
            &Language::from("en"),
            &[CollectionEntry::new("a", t(1))],
            t(2),
            &mut report,
        );
        assert_eq!(report.updated, 1);
        assert_eq!(
            set.get("https://example.com/blog/a")
                .and_then(|e| e.url.lastmod.as_deref()),
            Some("2026-06-01T12:00:00.000Z")
        );
    }

    #[test]
    fn grace_delays_single_removal() {
        let mut set = UrlSet::new();
        let urls = builder();
        let catalog = catalog();
        seed(&mut set, &urls, &catalog, vec![SitemapUrl::new("https://example.com/legal")]);
        let mut misses = BTreeMap::new();
        let mut report = ReconcileReport::default();

        assert!(!confirm_single_missing(&mut set, "https://example.com/legal", &mut misses, 2, &mut report));
        assert_eq!(misses.get("https://example.com/legal"), Some(&1));
        assert!(confirm_single_missing(&mut set, "https://example.com/legal", &mut misses, 2, &mut report));
        assert!(!set.contains("https://example.com/legal"));
        assert!(misses.is_empty());
        assert_eq!(report.removed, 1);
    }

    #[test]
    fn miss_on_absent_location_leaves_no_counter() {
        let mut set = UrlSet::new();
        let mut misses = BTreeMap::from([("https://example.com/legal".to_string(), 3)]);
        let mut report = ReconcileReport::default();
        assert!(!confirm_single_missing(&mut set, "https://example.com/legal", &mut misses, 5, &mut report));
        assert!(misses.is_empty());
    }

    #[test]
    fn prune_only_touches_its_own_group() {
        let urls = builder();
        let catalog = catalog();
        let kind = catalog.get("blog-posts").unwrap();
        let mut set = UrlSet::new();
        seed(
            &mut set,
            &urls,
            &catalog,
            vec![
                SitemapUrl::new("https://example.com/blog/keep"),
                SitemapUrl::new("https://example.com/blog/gone"),
                SitemapUrl::new("https://example.com/fr/blog/gone"),
                SitemapUrl::new("https://example.com/legal"),
            ],
        );
        let live = BTreeSet::from(["https://example.com/blog/keep".to_string()]);
        let mut report = ReconcileReport::default();
        let removed = prune_collection(&mut set, kind, &Language::from("en"), &live, &mut report);

        assert_eq!(removed, 1);
        assert!(set.contains("https://example.com/blog/keep"));
        assert!(!set.contains("https://example.com/blog/gone"));
        assert!(set.contains("https://example.com/fr/blog/gone"));
        assert!(set.contains("https://example.com/legal"));
    }

    #[test]
    fn prune_removes_nested_locations_under_the_prefix() {
        let urls = builder();
        let catalog = catalog();
        let kind = catalog.get("blog-posts").unwrap();
        let mut set = UrlSet::new();
        seed(
            &mut set,
            &urls,
            &catalog,
            vec![
                SitemapUrl::new("https://example.com/blog/2024/q1"),
                SitemapUrl::new("https://example.com/blog/q2"),
            ],
        );
        assert_eq!(
            set.get("https://example.com/blog/2024/q1").map(|e| e.group.clone()),
            Some(GroupKey::new("blog-posts", Language::from("en")))
        );

        let live = BTreeSet::from(["https://example.com/blog/q2".to_string()]);
        let mut report = ReconcileReport::default();
        let removed = prune_collection(&mut set, kind, &Language::from("en"), &live, &mut report);

        assert_eq!(removed, 1);
        assert!(!set.contains("https://example.com/blog/2024/q1"));
        assert!(set.contains("https://example.com/blog/q2"));
    }

    #[test]
    fn misses_for_undeclared_locations_are_dropped() {
        let urls = builder();
        let catalog = catalog();
        let source = MemorySource::new();
        let prior = RunState {
            last_successful_run_timestamp: Some(t(5)),
            single_misses: BTreeMap::from([
                ("https://example.com/old-page".to_string(), 1),
                ("https://example.com/fr/old-page".to_string(), 2),
            ]),
        };
        let outcome = Reconciler::new(&source, &urls, &catalog, t(6))
            .with_single_grace(3)
            .run(
                Mode::Incremental,
                &prior,
                vec![
                    SitemapUrl::new("https://example.com/old-page"),
                    SitemapUrl::new("https://example.com/legal"),
                ],
            );

        assert!(!outcome.single_misses.contains_key("https://example.com/old-page"));
        assert!(!outcome.single_misses.contains_key("https://example.com/fr/old-page"));
        assert_eq!(outcome.single_misses.get("https://example.com/legal"), Some(&1));
        assert!(outcome.urls.contains("https://example.com/old-page"));
    }

    #[test]
    fn full_mode_ignores_seed_and_prior_state() {
        let urls = builder();
        let catalog = catalog();
        let mut source = MemorySource::new();
        source.put_entry("blog-posts", "en", CollectionEntry::new("a", t(1)));
        let prior = RunState {
            last_successful_run_timestamp: Some(t(5)),
            single_misses: BTreeMap::from([("https://example.com/legal".to_string(), 1)]),
        };

        let outcome = Reconciler::new(&source, &urls, &catalog, t(6)).run(
            Mode::Full,
            &prior,
            vec![SitemapUrl::new("https://example.com/blog/old")],
        );

        assert!(!outcome.urls.contains("https://example.com/blog/old"));
        assert!(outcome.urls.contains("https://example.com/blog/a"));
        assert!(outcome.single_misses.is_empty());
        assert!(outcome.report.fetched_something_new);
        assert!(source
            .calls()
            .iter()
            .all(|c| !matches!(c, sitemapper_cms::SourceCall::Collection { since: Some(_), .. })));
    }

    #[test]
    fn heartbeat_kinds_are_never_fetched() {
        let urls = builder();
        let catalog = catalog();
        let source = MemorySource::new();
        Reconciler::new(&source, &urls, &catalog, t(6)).run(Mode::Full, &RunState::default(), vec![]);
        assert!(source.calls().iter().all(|c| !matches!(
            c,
            sitemapper_cms::SourceCall::Single { api_slug, .. } if api_slug == "home-page"
        )));
    }

    #[test]
    fn failed_single_lookup_is_not_a_deletion() {
        let urls = builder();
        let catalog = catalog();
        let mut source = MemorySource::new();
        source.fail("legal", "en");
        let prior = RunState {
            last_successful_run_timestamp: Some(t(5)),
            single_misses: BTreeMap::new(),
        };
        let outcome = Reconciler::new(&source, &urls, &catalog, t(6)).run(
            Mode::Incremental,
            &prior,
            vec![SitemapUrl::new("https://example.com/legal")],
        );
        assert!(outcome.urls.contains("https://example.com/legal"));
        assert_eq!(outcome.report.fetch_failures, 1);
        assert!(!outcome.report.fetched_something_new);
    }

    #[test]
    fn failed_full_listing_skips_pruning() {
        let urls = builder();
        let catalog = catalog();
        let mut source = MemorySource::new();
        source.fail("blog-posts", "en");
        let prior = RunState {
            last_successful_run_timestamp: Some(t(5)),
            single_misses: BTreeMap::new(),
        };
        let outcome = Reconciler::new(&source, &urls, &catalog, t(6)).run(
            Mode::Incremental,
            &prior,
            vec![SitemapUrl::new("https://example.com/blog/maybe-gone")],
        );
        assert!(outcome.urls.contains("https://example.com/blog/maybe-gone"));
    }
}
