//! Sitemapper core library: domain types, content catalog, URL builder,
//! settings, errors.
//!
//! - [`types`]: newtypes and the two record shapes
//! - [`catalog`]: declared content kinds
//! - [`urls`]: canonical URL construction and classification
//! - [`settings`]: validated run configuration
//! - [`error`]: [`ConfigError`], [`UrlError`]

pub mod catalog;
pub mod error;
pub mod settings;
pub mod types;
pub mod urls;

pub use catalog::{Catalog, ContentKind, KindShape};
pub use error::{ConfigError, UrlError};
pub use settings::{Mode, RawSettings, Settings};
pub use types::{
    format_lastmod, ChangeFrequency, GroupKey, Language, Languages, SitemapUrl, UrlEntry,
};
pub use urls::{Classification, KindType, UrlBuilder};
