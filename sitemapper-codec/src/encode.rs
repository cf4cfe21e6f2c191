//! Sitemap and sitemap-index serialization.
//!
//! # Output format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2026-01-01T00:00:00.000Z</lastmod>
//!     <changefreq>daily</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use sitemapper_core::SitemapUrl;

use crate::error::CodecError;
use crate::{IndexEntry, SITEMAP_NS};

type XmlWriter = Writer<Vec<u8>>;

/// Serialize one `<urlset>` document. Records are written in the given order.
pub fn encode_urlset(urls: &[SitemapUrl]) -> Result<String, CodecError> {
    let mut writer = start_document("urlset")?;
    for url in urls {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &url.loc)?;
        if let Some(lastmod) = &url.lastmod {
            write_text_element(&mut writer, "lastmod", lastmod)?;
        }
        if let Some(changefreq) = url.changefreq {
            write_text_element(&mut writer, "changefreq", changefreq.as_str())?;
        }
        if let Some(priority) = &url.priority {
            write_text_element(&mut writer, "priority", priority)?;
        }
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }
    finish_document(writer, "urlset")
}

/// Serialize one `<sitemapindex>` document.
pub fn encode_index(entries: &[IndexEntry]) -> Result<String, CodecError> {
    let mut writer = start_document("sitemapindex")?;
    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
        write_text_element(&mut writer, "loc", &entry.loc)?;
        if let Some(lastmod) = &entry.lastmod {
            write_text_element(&mut writer, "lastmod", lastmod)?;
        }
        writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
    }
    finish_document(writer, "sitemapindex")
}

fn start_document(root: &str) -> Result<XmlWriter, CodecError> {
    let mut writer = Writer::new_with_indent(Vec::with_capacity(4096), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut start = BytesStart::new(root);
    start.push_attribute(("xmlns", SITEMAP_NS));
    writer.write_event(Event::Start(start))?;
    Ok(writer)
}

fn finish_document(mut writer: XmlWriter, root: &str) -> Result<String, CodecError> {
    writer.write_event(Event::End(BytesEnd::new(root)))?;
    let mut xml = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    xml.push('\n');
    Ok(xml)
}

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<(), CodecError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
