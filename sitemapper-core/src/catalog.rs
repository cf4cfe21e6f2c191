//! Content catalog: the declared content kinds that may appear in sitemaps.
//!
//! # File layout
//!
//! ```yaml
//! kinds:
//!   - api_slug: news-articles
//!     type: collection
//!     path_prefix: news
//!     priority: 0.8
//!     change_frequency: daily
//!   - api_slug: home-page
//!     type: single
//!     path_segment: ""
//!     always_refresh: true
//! ```
//!
//! When no file is configured, [`Catalog::builtin`] is used.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::types::{ChangeFrequency, GroupKey, Language};

// ---------------------------------------------------------------------------
// 1. Kind descriptors
// ---------------------------------------------------------------------------

/// Whether a kind has one record per language or many, and its URL shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KindShape {
    /// Exactly one logical record per language, at `/{path_segment}`.
    Single {
        #[serde(default)]
        path_segment: String,
    },
    /// Zero or more records per language, at `/{path_prefix}/{slug}`.
    Collection { path_prefix: String },
}

/// A declared content kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentKind {
    /// CMS endpoint identifier (`/api/{api_slug}`).
    pub api_slug: String,
    #[serde(flatten)]
    pub shape: KindShape,
    #[serde(default)]
    pub change_frequency: ChangeFrequency,
    #[serde(default = "default_priority", deserialize_with = "priority_text")]
    pub priority: String,
    /// Overrides the default grouping base (`{api_slug}` / `single-{api_slug}`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_base: Option<String>,
    /// Re-emitted every run with a fresh timestamp instead of being fetched.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub always_refresh: bool,
}

impl ContentKind {
    pub fn single(api_slug: &str, path_segment: &str) -> Self {
        Self {
            api_slug: api_slug.to_owned(),
            shape: KindShape::Single {
                path_segment: path_segment.to_owned(),
            },
            change_frequency: ChangeFrequency::default(),
            priority: default_priority(),
            group_base: None,
            always_refresh: false,
        }
    }

    pub fn collection(api_slug: &str, path_prefix: &str) -> Self {
        Self {
            api_slug: api_slug.to_owned(),
            shape: KindShape::Collection {
                path_prefix: path_prefix.to_owned(),
            },
            change_frequency: ChangeFrequency::default(),
            priority: default_priority(),
            group_base: None,
            always_refresh: false,
        }
    }

    pub fn with_hints(mut self, priority: &str, change_frequency: ChangeFrequency) -> Self {
        self.priority = priority.to_owned();
        self.change_frequency = change_frequency;
        self
    }

    pub fn heartbeat(mut self) -> Self {
        self.always_refresh = true;
        self
    }

    pub fn is_single(&self) -> bool {
        matches!(self.shape, KindShape::Single { .. })
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.shape, KindShape::Collection { .. })
    }

    /// Grouping base shared by every language of this kind.
    pub fn group_base(&self) -> String {
        if let Some(base) = &self.group_base {
            return base.clone();
        }
        match self.shape {
            KindShape::Single { .. } => format!("single-{}", self.api_slug),
            KindShape::Collection { .. } => self.api_slug.clone(),
        }
    }

    pub fn group_key(&self, language: &Language) -> GroupKey {
        GroupKey::new(self.group_base(), language.clone())
    }
}

fn default_priority() -> String {
    "0.5".to_string()
}

/// Accept `priority: 0.8` as well as `priority: "0.8"`.
fn priority_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => format!("{n:.1}"),
    })
}

// ---------------------------------------------------------------------------
// 2. Catalog
// ---------------------------------------------------------------------------

/// Ordered, validated list of content kinds. Processing order follows
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    kinds: Vec<ContentKind>,
}

impl Catalog {
    pub fn new(kinds: Vec<ContentKind>) -> Result<Self, ConfigError> {
        let catalog = Self { kinds };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The content kinds of the production site this tool was written for.
    pub fn builtin() -> Self {
        use ChangeFrequency::{Daily, Monthly, Weekly, Yearly};

        Self {
            kinds: vec![
                ContentKind::collection("reports", "reports").with_hints("0.7", Weekly),
                ContentKind::collection("news-articles", "news").with_hints("0.8", Daily),
                ContentKind::collection("blog-posts", "blog").with_hints("0.6", Monthly),
                ContentKind::single("home-page", "").with_hints("1.0", Daily).heartbeat(),
                ContentKind::single("about-page", "about").with_hints("0.5", Yearly),
                ContentKind::single("cancellation-policy", "cancellation-policy")
                    .with_hints("0.3", Yearly),
                ContentKind::single("contact-page", "contact").with_hints("0.5", Yearly),
                ContentKind::single("disclaimer", "disclaimer").with_hints("0.3", Yearly),
                ContentKind::single("legal", "legal").with_hints("0.3", Yearly),
                ContentKind::single("privacy-policy", "privacy-policy").with_hints("0.3", Yearly),
                ContentKind::single("services-page", "services").with_hints("0.7", Monthly),
                ContentKind::single("t-and-c", "terms-and-conditions").with_hints("0.3", Yearly),
            ],
        }
    }

    /// Load and validate a catalog YAML file.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: Catalog = serde_yaml::from_str(&contents).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Serialize back to the YAML file format.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentKind> {
        self.kinds.iter()
    }

    pub fn collections(&self) -> impl Iterator<Item = &ContentKind> {
        self.kinds.iter().filter(|k| k.is_collection())
    }

    pub fn get(&self, api_slug: &str) -> Option<&ContentKind> {
        self.kinds.iter().find(|k| k.api_slug == api_slug)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut slugs = HashSet::new();
        let mut patterns = HashSet::new();
        let mut bases = HashSet::new();

        for kind in &self.kinds {
            if kind.api_slug.is_empty() || kind.api_slug.contains('/') {
                return Err(ConfigError::Catalog(format!(
                    "'{}' is not a valid api slug",
                    kind.api_slug
                )));
            }
            if !slugs.insert(kind.api_slug.as_str()) {
                return Err(ConfigError::Catalog(format!(
                    "api slug '{}' declared twice",
                    kind.api_slug
                )));
            }
            let pattern = match &kind.shape {
                KindShape::Single { path_segment } => {
                    if path_segment.starts_with('/') || path_segment.ends_with('/') {
                        return Err(ConfigError::Catalog(format!(
                            "'{}': path_segment must not start or end with '/'",
                            kind.api_slug
                        )));
                    }
                    format!("single:{path_segment}")
                }
                KindShape::Collection { path_prefix } => {
                    if path_prefix.is_empty() || path_prefix.contains('/') {
                        return Err(ConfigError::Catalog(format!(
                            "'{}': path_prefix must be one non-empty path segment",
                            kind.api_slug
                        )));
                    }
                    if kind.always_refresh {
                        return Err(ConfigError::Catalog(format!(
                            "'{}': always_refresh is only allowed on single kinds",
                            kind.api_slug
                        )));
                    }
                    format!("collection:{path_prefix}")
                }
            };
            if !patterns.insert(pattern) {
                return Err(ConfigError::Catalog(format!(
                    "'{}' shares its URL path with another kind",
                    kind.api_slug
                )));
            }
            let base = kind.group_base();
            if base == GroupKey::UNCATEGORIZED {
                return Err(ConfigError::Catalog(format!(
                    "'{}': group '{base}' is reserved for unmatched pages",
                    kind.api_slug
                )));
            }
            if !bases.insert(base) {
                return Err(ConfigError::Catalog(format!(
                    "'{}' shares its group with another kind",
                    kind.api_slug
                )));
            }
        }

        // Everything below a collection prefix belongs to that collection.
        for kind in &self.kinds {
            let KindShape::Single { path_segment } = &kind.shape else {
                continue;
            };
            let Some((head, _)) = path_segment.split_once('/') else {
                continue;
            };
            if let Some(owner) = self.collections().find(|c| {
                matches!(&c.shape, KindShape::Collection { path_prefix } if path_prefix == head)
            }) {
                return Err(ConfigError::Catalog(format!(
                    "'{}': path '{path_segment}' lies inside collection '{}'",
                    kind.api_slug, owner.api_slug
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
