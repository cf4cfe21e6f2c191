//! # sitemapper-cms
//!
//! Read-only access to a Strapi content API.
//!
//! - [`client::StrapiClient`] pages through collections and looks up single
//!   kinds over any [`transport::Transport`]
//! - [`source::ContentSource`] is what the engine consumes; the client and
//!   [`source::MemorySource`] both implement it

pub mod client;
pub mod error;
pub mod records;
pub mod source;
pub mod transport;

pub use client::StrapiClient;
pub use error::FetchError;
pub use records::{CollectionEntry, SingleEntry, SingleLookup};
pub use source::{ContentSource, MemorySource, SourceCall};
pub use transport::{HttpTransport, Query, Transport};

use sitemapper_core::settings::CmsSettings;

/// Client for the configured CMS over HTTP.
pub fn connect(settings: &CmsSettings) -> StrapiClient<HttpTransport> {
    StrapiClient::new(HttpTransport::new(settings), settings.page_size)
}
