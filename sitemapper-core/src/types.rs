//! Domain types shared by every sitemapper crate.
//!
//! Two record shapes exist on purpose: [`SitemapUrl`] carries only the
//! standard sitemap fields and maps one-to-one onto the XML, while
//! [`UrlEntry`] is the in-memory working record that adds the partitioning
//! [`GroupKey`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{invalid, ConfigError};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A locale code as used by the CMS and in URL prefixes (`en`, `fr`, `pt-BR`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Language(pub String);

impl Language {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The configured languages. The first one is the default language and gets
/// no URL prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Languages {
    list: Vec<Language>,
}

impl Languages {
    /// Build from an ordered list; rejects empty lists and duplicates.
    pub fn new(list: Vec<Language>) -> Result<Self, ConfigError> {
        if list.is_empty() {
            return Err(invalid("LANGUAGES", "at least one language is required"));
        }
        for (i, lang) in list.iter().enumerate() {
            if lang.0.is_empty() || lang.0.contains('/') {
                return Err(invalid("LANGUAGES", format!("'{lang}' is not a locale code")));
            }
            if list[..i].contains(lang) {
                return Err(invalid("LANGUAGES", format!("'{lang}' is listed twice")));
            }
        }
        Ok(Self { list })
    }

    /// Parse a comma-separated list such as `"en, fr,de"`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let list = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Language::from)
            .collect();
        Self::new(list)
    }

    pub fn default_language(&self) -> &Language {
        &self.list[0]
    }

    pub fn is_default(&self, language: &Language) -> bool {
        self.default_language() == language
    }

    pub fn contains(&self, language: &Language) -> bool {
        self.list.contains(language)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.list.iter()
    }

    /// Every language except the default one, in configured order.
    pub fn prefixed(&self) -> impl Iterator<Item = &Language> {
        self.list.iter().skip(1)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// `<changefreq>` values allowed by the sitemap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown change frequency '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One sitemap `<url>` entry exactly as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapUrl {
    pub loc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<ChangeFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl SitemapUrl {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }
}

/// Output partition a record belongs to. Not part of the persisted format;
/// recomputed from the URL path when files are read back.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub base: String,
    pub language: Language,
}

impl GroupKey {
    /// Base used for records that match no declared content kind.
    pub const UNCATEGORIZED: &'static str = "other-pages";

    pub fn new(base: impl Into<String>, language: Language) -> Self {
        Self {
            base: base.into(),
            language,
        }
    }

    pub fn uncategorized(language: Language) -> Self {
        Self::new(Self::UNCATEGORIZED, language)
    }

    pub fn is_uncategorized(&self) -> bool {
        self.base == Self::UNCATEGORIZED
    }

    /// File name stem for this group, e.g. `news-articles-fr`.
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.base, self.language)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}

/// Working record: the persisted fields plus the partitioning key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    pub url: SitemapUrl,
    pub group: GroupKey,
}

/// Format a timestamp the way `<lastmod>` values are written
/// (`2026-01-02T03:04:05.000Z`).
pub fn format_lastmod(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
