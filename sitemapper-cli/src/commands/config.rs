//! Flags shared by commands that resolve full run settings.

use std::path::PathBuf;

use clap::Args;
use sitemapper_core::{Mode, RawSettings};

/// Run configuration. Every flag falls back to its environment variable.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Base URL of the Strapi instance.
    #[arg(long, env = "STRAPI_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the Strapi API.
    #[arg(long, env = "STRAPI_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Public site origin used in every `<loc>`.
    #[arg(long, env = "SITE_BASE_URL")]
    pub site_url: Option<String>,

    /// Comma-separated language codes; the first is the default language.
    #[arg(long, env = "LANGUAGES")]
    pub languages: Option<String>,

    /// Directory receiving the sitemap files, the index and the run state.
    #[arg(long, env = "SITEMAP_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// `full` rebuilds everything; `incremental` fetches only changes.
    #[arg(long, env = "SITEMAP_GENERATION_MODE", default_value = "full")]
    pub mode: Mode,

    /// Records requested per CMS page.
    #[arg(long, env = "SITEMAP_PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// Maximum URLs per sitemap file.
    #[arg(long, env = "SITEMAP_URL_LIMIT")]
    pub url_limit: Option<usize>,

    /// File name of the sitemap index.
    #[arg(long, env = "SITEMAP_INDEX_FILE")]
    pub index_file: Option<String>,

    /// Path segment between the site origin and each file in the index.
    #[arg(long, env = "SITEMAP_PUBLIC_PATH")]
    pub public_path: Option<String>,

    /// Consecutive not-found runs before a single page is dropped.
    #[arg(long, env = "SITEMAP_SINGLE_GRACE")]
    pub single_grace: Option<u32>,

    /// YAML file declaring the content kinds (built-in list when absent).
    #[arg(long, env = "SITEMAP_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// CMS request timeout in seconds.
    #[arg(long, env = "STRAPI_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl ConfigArgs {
    pub fn into_raw(self) -> RawSettings {
        RawSettings {
            api_url: self.api_url,
            api_token: self.api_token,
            site_url: self.site_url,
            languages: self.languages,
            output_dir: self.output_dir,
            mode: self.mode,
            page_size: self.page_size,
            url_limit: self.url_limit,
            index_file: self.index_file,
            public_path: self.public_path,
            single_grace: self.single_grace,
            catalog: self.catalog,
            timeout_secs: self.timeout_secs,
        }
    }
}
