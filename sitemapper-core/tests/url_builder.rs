//! URL shape, default-language, injectivity and classification tests.

use std::collections::HashSet;

use rstest::rstest;
use sitemapper_core::{Catalog, KindType, Language, Languages, UrlBuilder, UrlError};

fn builder() -> UrlBuilder {
    UrlBuilder::new(
        "https://example.com",
        Languages::parse("en,fr,de").expect("languages"),
    )
}

fn lang(code: &str) -> Language {
    Language::from(code)
}

// ---------------------------------------------------------------------------
// 1. Shapes
// ---------------------------------------------------------------------------

#[rstest]
#[case("en", "", "https://example.com/")]
#[case("fr", "", "https://example.com/fr")]
#[case("de", "", "https://example.com/de")]
#[case("en", "about", "https://example.com/about")]
#[case("fr", "about", "https://example.com/fr/about")]
#[case("fr", "terms-and-conditions", "https://example.com/fr/terms-and-conditions")]
fn single_urls(#[case] language: &str, #[case] segment: &str, #[case] expected: &str) {
    let url = builder()
        .build_url(&lang(language), segment, KindType::Single, None)
        .expect("single");
    assert_eq!(url, expected);
}

#[rstest]
#[case("en", "news", "hello", "https://example.com/news/hello")]
#[case("fr", "news", "bonjour", "https://example.com/fr/news/bonjour")]
#[case("de", "blog", "x-y-z", "https://example.com/de/blog/x-y-z")]
fn collection_urls(
    #[case] language: &str,
    #[case] prefix: &str,
    #[case] slug: &str,
    #[case] expected: &str,
) {
    let url = builder()
        .build_url(&lang(language), prefix, KindType::Collection, Some(slug))
        .expect("collection");
    assert_eq!(url, expected);
}

#[test]
fn collection_without_slug_is_an_error() {
    let err = builder()
        .build_url(&lang("en"), "news", KindType::Collection, None)
        .unwrap_err();
    assert!(matches!(err, UrlError::MissingSlug { .. }));
}

#[test]
fn slug_is_ignored_for_single_shape() {
    let b = builder();
    let with = b
        .build_url(&lang("fr"), "about", KindType::Single, Some("ignored"))
        .expect("single");
    let without = b
        .build_url(&lang("fr"), "about", KindType::Single, None)
        .expect("single");
    assert_eq!(with, without);
}

// ---------------------------------------------------------------------------
// 2. Determinism and injectivity
// ---------------------------------------------------------------------------

#[test]
fn builtin_catalog_locations_are_unique_and_stable() {
    let b = builder();
    let catalog = Catalog::builtin();
    let slugs = ["a", "b", "news", "about"];

    let mut seen = HashSet::new();
    for language in b.languages().iter() {
        for kind in catalog.iter() {
            if kind.is_collection() {
                for slug in slugs {
                    let first = b.url_for(kind, language, Some(slug)).expect("url");
                    let second = b.url_for(kind, language, Some(slug)).expect("url");
                    assert_eq!(first, second);
                    assert!(seen.insert(first.clone()), "duplicate location {first}");
                }
            } else {
                let url = b.url_for(kind, language, None).expect("url");
                assert!(seen.insert(url.clone()), "duplicate location {url}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Classification
// ---------------------------------------------------------------------------

#[test]
fn classify_inverts_build_for_every_declared_kind() {
    let b = builder();
    let catalog = Catalog::builtin();
    for language in b.languages().iter() {
        for kind in catalog.iter() {
            let url = b.url_for(kind, language, Some("some-slug")).expect("url");
            let classified = b.classify(&catalog, &url);
            assert_eq!(classified.kind.map(|k| k.api_slug.as_str()), Some(kind.api_slug.as_str()));
            assert_eq!(&classified.language, language);
            assert_eq!(classified.group, kind.group_key(language));
        }
    }
}

#[rstest]
#[case("https://example.com/unknown-page", "en")]
#[case("https://example.com/fr/unknown-page", "fr")]
#[case("https://example.com/news/", "en")]
#[case("https://example.com/de/news", "de")]
fn unmatched_locations_are_uncategorized(#[case] location: &str, #[case] language: &str) {
    let b = builder();
    let catalog = Catalog::builtin();
    let classified = b.classify(&catalog, location);
    assert!(classified.kind.is_none());
    assert!(classified.group.is_uncategorized());
    assert_eq!(classified.group.file_stem(), format!("other-pages-{language}"));
}
