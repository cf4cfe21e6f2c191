//! Canonical URL construction and the reverse mapping used to re-derive
//! grouping keys from persisted locations.
//!
//! [`UrlBuilder::build_url`] is the only place that knows the URL shape.
//! [`UrlBuilder::classify`] rebuilds each candidate location through
//! `build_url` and compares, so the two directions cannot drift apart. The one
//! exception is a location nested below a collection prefix
//! (`/news/2024/q1`): `build_url` never produces it, and it is claimed by that
//! collection so deletion pruning can remove it.

use crate::catalog::{Catalog, ContentKind, KindShape};
use crate::error::UrlError;
use crate::types::{GroupKey, Language, Languages};

/// Which URL shape to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindType {
    Single,
    Collection,
}

/// Result of matching a location against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'c> {
    /// The unique kind whose URL pattern produced this location, if any.
    pub kind: Option<&'c ContentKind>,
    pub language: Language,
    pub group: GroupKey,
}

/// Builds absolute site URLs for a fixed site base and language set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base: String,
    languages: Languages,
}

impl UrlBuilder {
    pub fn new(site_base: &str, languages: Languages) -> Self {
        Self {
            base: site_base.trim_end_matches('/').to_string(),
            languages,
        }
    }

    /// Site base without trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn languages(&self) -> &Languages {
        &self.languages
    }

    /// `""` for the default language, `/{language}` otherwise.
    pub fn language_prefix(&self, language: &Language) -> String {
        if self.languages.is_default(language) || language.0.is_empty() {
            String::new()
        } else {
            format!("/{language}")
        }
    }

    /// Build the canonical location of a page.
    ///
    /// - single: `base + prefix + "/" + path`; an empty path is the language
    ///   root (`base/` for the default language, `base/{language}` otherwise).
    /// - collection: `base + prefix + "/" + path + "/" + slug`; the slug is
    ///   required and must be a single path segment.
    pub fn build_url(
        &self,
        language: &Language,
        path: &str,
        kind: KindType,
        slug: Option<&str>,
    ) -> Result<String, UrlError> {
        let prefix = self.language_prefix(language);
        match kind {
            KindType::Single if path.is_empty() => {
                if prefix.is_empty() {
                    Ok(format!("{}/", self.base))
                } else {
                    Ok(format!("{}{prefix}", self.base))
                }
            }
            KindType::Single => Ok(format!("{}{prefix}/{path}", self.base)),
            KindType::Collection => match slug {
                Some(slug) if slug.contains('/') => Err(UrlError::NestedSlug {
                    path_prefix: path.to_string(),
                    slug: slug.to_string(),
                }),
                Some(slug) if !slug.is_empty() => {
                    Ok(format!("{}{prefix}/{path}/{slug}", self.base))
                }
                _ => Err(UrlError::MissingSlug {
                    path_prefix: path.to_string(),
                }),
            },
        }
    }

    /// Location of a record of `kind`. `slug` is ignored for single kinds.
    pub fn url_for(
        &self,
        kind: &ContentKind,
        language: &Language,
        slug: Option<&str>,
    ) -> Result<String, UrlError> {
        match &kind.shape {
            KindShape::Single { path_segment } => {
                self.build_url(language, path_segment, KindType::Single, None)
            }
            KindShape::Collection { path_prefix } => {
                self.build_url(language, path_prefix, KindType::Collection, slug)
            }
        }
    }

    /// Language a location belongs to: the first path segment when it names a
    /// configured non-default language, the default language otherwise.
    pub fn language_of(&self, location: &str) -> Language {
        let path = location.strip_prefix(&self.base).unwrap_or("");
        for language in self.languages.prefixed() {
            let prefix = format!("/{language}");
            if let Some(rest) = path.strip_prefix(&prefix) {
                if rest.is_empty() || rest.starts_with('/') {
                    return language.clone();
                }
            }
        }
        self.languages.default_language().clone()
    }

    /// Re-derive the kind and grouping key of a persisted location.
    ///
    /// Exactly one matching kind yields that kind's key; no match, several
    /// matches, or a location outside the site base yield the uncategorized
    /// key for the resolved language.
    pub fn classify<'c>(&self, catalog: &'c Catalog, location: &str) -> Classification<'c> {
        let language = self.language_of(location);
        if !location.starts_with(&self.base) {
            return Classification {
                kind: None,
                group: GroupKey::uncategorized(language.clone()),
                language,
            };
        }

        let mut matches = catalog
            .iter()
            .filter(|kind| self.produces(kind, &language, location));
        let kind = match (matches.next(), matches.next()) {
            (Some(kind), None) => Some(kind),
            _ => None,
        };
        let group = match kind {
            Some(kind) => kind.group_key(&language),
            None => GroupKey::uncategorized(language.clone()),
        };
        Classification {
            kind,
            language,
            group,
        }
    }

    /// Whether `location` belongs to this kind: `build_url` could have
    /// produced it, or it lies nested below the kind's collection prefix.
    fn produces(&self, kind: &ContentKind, language: &Language, location: &str) -> bool {
        match &kind.shape {
            KindShape::Single { .. } => {
                self.url_for(kind, language, None).as_deref() == Ok(location)
            }
            KindShape::Collection { path_prefix } => {
                let head = format!(
                    "{}{}/{path_prefix}/",
                    self.base,
                    self.language_prefix(language)
                );
                let Some(slug) = location.strip_prefix(&head) else {
                    return false;
                };
                if slug.is_empty() {
                    return false;
                }
                if slug.contains('/') {
                    return true;
                }
                self.url_for(kind, language, Some(slug)).as_deref() == Ok(location)
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

    fn builder() -> UrlBuilder {
        UrlBuilder::new(
            "https://example.com/",
            Languages::parse("en,fr").expect("languages"),
        )
    }

    #[test]
    fn base_trailing_slash_is_normalized() {
        assert_eq!(builder().base(), "https://example.com");
    }

    #[test]
    fn empty_slug_is_missing() {
        let err = builder()
            .build_url(&Language::from("en"), "news", KindType::Collection, Some(""))
            .unwrap_err();
        assert_eq!(
            err,
            UrlError::MissingSlug {
                path_prefix: "news".into()
            }
        );
    }

    #[test]
    fn language_of_requires_full_segment() {
        let b = builder();
        assert_eq!(b.language_of("https://example.com/fr"), Language::from("fr"));
        assert_eq!(b.language_of("https://example.com/fr/news/a"), Language::from("fr"));
        assert_eq!(b.language_of("https://example.com/frogs"), Language::from("en"));
        assert_eq!(b.language_of("https://other.org/fr"), Language::from("en"));
    }

    #[test]
    fn nested_slug_is_rejected() {
        let err = builder()
            .build_url(&Language::from("fr"), "news", KindType::Collection, Some("2024/q1"))
            .unwrap_err();
        assert_eq!(
            err,
            UrlError::NestedSlug {
                path_prefix: "news".into(),
                slug: "2024/q1".into()
            }
        );
    }

    #[test]
    fn nested_collection_paths_belong_to_the_collection() {
        let b = builder();
        let catalog = Catalog::builtin();
        let c = b.classify(&catalog, "https://example.com/fr/news/2024/q1");
        assert_eq!(c.kind.map(|k| k.api_slug.as_str()), Some("news-articles"));
        assert_eq!(c.group, GroupKey::new("news-articles", Language::from("fr")));
    }

    #[test]
    fn classify_foreign_host_is_uncategorized() {
        let b = builder();
        let catalog = Catalog::builtin();
        let c = b.classify(&catalog, "https://elsewhere.org/about");
        assert!(c.group.is_uncategorized());
        assert_eq!(c.language, Language::from("en"));
    }
}
