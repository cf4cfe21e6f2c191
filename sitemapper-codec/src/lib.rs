//! # sitemapper-codec
//!
//! Sitemap-protocol XML encoding and decoding on top of `quick-xml`.
//!
//! Only [`SitemapUrl`](sitemapper_core::SitemapUrl) crosses this boundary;
//! grouping keys never reach the wire.

pub mod decode;
pub mod encode;
pub mod error;

pub use decode::{decode_index, decode_urlset, read_urlset_file, try_read_urlset_file};
pub use encode::{encode_index, encode_urlset};
pub use error::CodecError;

/// Namespace of both `<urlset>` and `<sitemapindex>` documents.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<sitemap>` entry of an index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub loc: String,
    pub lastmod: Option<String>,
}
