//! Run settings, resolved once at startup.
//!
//! The binary collects raw values (flags with environment fallbacks) into
//! [`RawSettings`]; [`Settings::resolve`] validates them all before any I/O
//! so a misconfigured run fails fast.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::error::{invalid, ConfigError};
use crate::types::Languages;
use crate::urls::UrlBuilder;

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_URL_LIMIT: usize = 45_000;
/// Hard limit of the sitemap protocol.
pub const PROTOCOL_URL_LIMIT: usize = 50_000;
pub const DEFAULT_INDEX_FILE: &str = "sitemap.xml";
pub const DEFAULT_PUBLIC_PATH: &str = "sitemaps";
pub const STATE_FILE: &str = "sitemap_state.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Regeneration strategy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Rebuild everything from an unfiltered fetch.
    #[default]
    Full,
    /// Seed from the previous output and fetch only what changed.
    Incremental,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Full => write!(f, "full"),
            Mode::Incremental => write!(f, "incremental"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Mode::Full),
            "incremental" => Ok(Mode::Incremental),
            other => Err(format!(
                "unknown mode '{other}'; expected: full, incremental"
            )),
        }
    }
}

/// Unvalidated settings as gathered from flags and environment.
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub site_url: Option<String>,
    pub languages: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub mode: Mode,
    pub page_size: Option<u32>,
    pub url_limit: Option<usize>,
    pub index_file: Option<String>,
    pub public_path: Option<String>,
    pub single_grace: Option<u32>,
    pub catalog: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Connection settings for the CMS.
#[derive(Clone, PartialEq, Eq)]
pub struct CmsSettings {
    pub api_url: String,
    pub api_token: String,
    pub page_size: u32,
    pub timeout: Duration,
}

impl fmt::Debug for CmsSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmsSettings")
            .field("api_url", &self.api_url)
            .field("api_token", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Output layout settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub url_limit: usize,
    pub index_file: String,
    pub public_path: String,
}

impl OutputSettings {
    pub fn index_path(&self) -> PathBuf {
        self.dir.join(&self.index_file)
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }
}

/// Fully validated settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub cms: CmsSettings,
    pub urls: UrlBuilder,
    pub output: OutputSettings,
    pub mode: Mode,
    /// Consecutive not-found observations before a single-kind URL is removed.
    pub single_grace: u32,
    pub catalog: Catalog,
}

impl Settings {
    /// Validate raw settings. Reports every missing required setting at once.
    pub fn resolve(raw: RawSettings) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let api_url = required(raw.api_url, "STRAPI_API_URL", &mut missing);
        let api_token = required(raw.api_token, "STRAPI_API_TOKEN", &mut missing);
        let site_url = required(raw.site_url, "SITE_BASE_URL", &mut missing);
        let output_dir = raw
            .output_dir
            .filter(|p| !p.as_os_str().is_empty());
        if output_dir.is_none() {
            missing.push("SITEMAP_OUTPUT_DIR");
        }
        let (Some(api_url), Some(api_token), Some(site_url), Some(output_dir)) =
            (api_url, api_token, site_url, output_dir)
        else {
            return Err(ConfigError::Missing { names: missing });
        };

        for (name, value) in [("STRAPI_API_URL", &api_url), ("SITE_BASE_URL", &site_url)] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid(name, format!("'{value}' is not an http(s) URL")));
            }
        }

        let languages = Languages::parse(raw.languages.as_deref().unwrap_or("en"))?;

        let page_size = raw.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(invalid("SITEMAP_PAGE_SIZE", "must be at least 1"));
        }
        let url_limit = raw.url_limit.unwrap_or(DEFAULT_URL_LIMIT);
        if url_limit == 0 || url_limit > PROTOCOL_URL_LIMIT {
            return Err(invalid(
                "SITEMAP_URL_LIMIT",
                format!("must be between 1 and {PROTOCOL_URL_LIMIT}"),
            ));
        }
        let single_grace = raw.single_grace.unwrap_or(1);
        if single_grace == 0 {
            return Err(invalid("SITEMAP_SINGLE_GRACE", "must be at least 1"));
        }

        let index_file = raw
            .index_file
            .unwrap_or_else(|| DEFAULT_INDEX_FILE.to_string());
        if !index_file.ends_with(".xml") || index_file.contains('/') {
            return Err(invalid(
                "SITEMAP_INDEX_FILE",
                "must be a bare file name ending in .xml",
            ));
        }
        let public_path = raw
            .public_path
            .unwrap_or_else(|| DEFAULT_PUBLIC_PATH.to_string())
            .trim_matches('/')
            .to_string();

        let catalog = match raw.catalog {
            Some(path) => Catalog::load_at(&path)?,
            None => Catalog::builtin(),
        };
        check_language_collisions(&catalog, &languages)?;

        Ok(Self {
            cms: CmsSettings {
                api_url: api_url.trim_end_matches('/').to_string(),
                api_token,
                page_size,
                timeout: raw
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_TIMEOUT),
            },
            urls: UrlBuilder::new(&site_url, languages),
            output: OutputSettings {
                dir: output_dir,
                url_limit,
                index_file,
                public_path,
            },
            mode: raw.mode,
            single_grace,
            catalog,
        })
    }
}

fn required(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(name);
            None
        }
    }
}

/// A language code that equals a top-level path would make two pages share
/// one location.
fn check_language_collisions(catalog: &Catalog, languages: &Languages) -> Result<(), ConfigError> {
    use crate::catalog::KindShape;

    for kind in catalog.iter() {
        let head = match &kind.shape {
            KindShape::Single { path_segment } => path_segment.split('/').next().unwrap_or(""),
            KindShape::Collection { path_prefix } => path_prefix.as_str(),
        };
        if languages.prefixed().any(|lang| lang.as_str() == head) {
            return Err(ConfigError::Catalog(format!(
                "'{}' uses path '{head}', which is also a language prefix",
                kind.api_slug
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
