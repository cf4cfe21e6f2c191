//! Sitemap parsing.
//!
//! The reader is deliberately lenient about content: namespace prefixes are
//! ignored, unknown elements (such as the `xhtml:link` alternates written by
//! older generators) are skipped, and unknown `changefreq` values are dropped.
//! It is strict about structure: malformed XML or the wrong root element is a
//! [`CodecError`].

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use sitemapper_core::SitemapUrl;

use crate::error::CodecError;
use crate::IndexEntry;

/// Parse a `<urlset>` document. `<url>` elements without a `<loc>` are skipped.
pub fn decode_urlset(xml: &str) -> Result<Vec<SitemapUrl>, CodecError> {
    let items = parse_items(xml, "urlset", "url")?;
    Ok(items
        .into_iter()
        .filter_map(|fields| {
            let mut url = SitemapUrl::new(field(&fields, "loc")?);
            url.lastmod = field(&fields, "lastmod");
            url.changefreq = field(&fields, "changefreq").and_then(|v| v.parse().ok());
            url.priority = field(&fields, "priority");
            Some(url)
        })
        .collect())
}

/// Parse a `<sitemapindex>` document.
pub fn decode_index(xml: &str) -> Result<Vec<IndexEntry>, CodecError> {
    let items = parse_items(xml, "sitemapindex", "sitemap")?;
    Ok(items
        .into_iter()
        .filter_map(|fields| {
            Some(IndexEntry {
                loc: field(&fields, "loc")?,
                lastmod: field(&fields, "lastmod"),
            })
        })
        .collect())
}

/// Read and parse a sitemap file, propagating failures.
pub fn try_read_urlset_file(path: &Path) -> Result<Vec<SitemapUrl>, CodecError> {
    let xml = std::fs::read_to_string(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_urlset(&xml)
}

/// Read and parse a sitemap file. Any failure is logged and yields no URLs.
pub fn read_urlset_file(path: &Path) -> Vec<SitemapUrl> {
    match try_read_urlset_file(path) {
        Ok(urls) => urls,
        Err(err) => {
            tracing::warn!("could not parse existing sitemap {}: {err}", path.display());
            Vec::new()
        }
    }
}

/// Child elements of one item: `(local name, trimmed text)`.
type Fields = Vec<(String, String)>;

fn field(fields: &Fields, name: &str) -> Option<String> {
    fields
        .iter()
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value.clone())
}

/// Collect the direct text children of every `<item>` under `<root>`.
fn parse_items(xml: &str, root: &'static str, item: &str) -> Result<Vec<Fields>, CodecError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<Fields> = None;
    let mut field_name: Option<String> = None;
    let mut text = String::new();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|source| CodecError::Xml {
            position: reader.error_position(),
            source,
        })?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if depth == 0 {
                    if name != root {
                        return Err(CodecError::UnexpectedRoot {
                            expected: root,
                            found: name,
                        });
                    }
                    seen_root = true;
                } else if depth == 1 && name == item && !is_empty {
                    current = Some(Vec::new());
                } else if depth == 2 && current.is_some() && !is_empty {
                    field_name = Some(name);
                    text.clear();
                }
                if !is_empty {
                    depth += 1;
                }
            }
            Event::Text(ref e) if field_name.is_some() => {
                let unescaped = e.unescape().map_err(|source| CodecError::Xml {
                    position: reader.buffer_position(),
                    source,
                })?;
                text.push_str(&unescaped);
            }
            Event::CData(ref e) if field_name.is_some() => {
                text.push_str(&String::from_utf8_lossy(e));
            }
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or(CodecError::Truncated)?;
                if depth == 2 {
                    if let (Some(name), Some(fields)) = (field_name.take(), current.as_mut()) {
                        fields.push((name, text.trim().to_string()));
                    }
                } else if depth == 1 {
                    if let Some(fields) = current.take() {
                        items.push(fields);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root || depth != 0 {
        return Err(CodecError::Truncated);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sitemapper_core::ChangeFrequency;

    #[test]
    fn decodes_all_fields() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/news/a?x=1&amp;y=2</loc>
    <lastmod>2026-01-01T00:00:00.000Z</lastmod>
    <changefreq>daily</changefreq>
    <priority>0.8</priority>
  </url>
</urlset>"#;
        let urls = decode_urlset(xml).expect("decode");
        assert_eq!(
            urls,
            vec![SitemapUrl {
                loc: "https://example.com/news/a?x=1&y=2".to_string(),
                lastmod: Some("2026-01-01T00:00:00.000Z".to_string()),
                changefreq: Some(ChangeFrequency::Daily),
                priority: Some("0.8".to_string()),
            }]
        );
    }

    #[test]
    fn empty_root_element_is_valid() {
        let urls = decode_urlset(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"/>"#)
            .expect("decode");
        assert!(urls.is_empty());
    }

    #[test]
    fn url_without_loc_is_skipped() {
        let xml = "<urlset><url><lastmod>2026-01-01</lastmod></url><url><loc>https://e.com/</loc></url></urlset>";
        let urls = decode_urlset(xml).expect("decode");
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].loc, "https://e.com/");
    }

    #[test]
    fn unknown_changefreq_is_dropped() {
        let xml = "<urlset><url><loc>https://e.com/</loc><changefreq>fortnightly</changefreq></url></urlset>";
        let urls = decode_urlset(xml).expect("decode");
        assert_eq!(urls[0].changefreq, None);
    }

    fn error_kind(err: &CodecError) -> &'static str {
        match err {
            CodecError::Xml { .. } => "xml",
            CodecError::UnexpectedRoot { .. } => "root",
            CodecError::Truncated => "truncated",
            CodecError::Write(_) | CodecError::Io { .. } => "io",
        }
    }

    #[rstest]
    #[case::wrong_root("<feed><entry/></feed>", &["root"])]
    #[case::wrong_empty_root("<feed/>", &["root"])]
    #[case::empty_input("", &["truncated"])]
    #[case::whitespace_only("  \n ", &["truncated"])]
    #[case::unclosed("<urlset><url><loc>https://e.com/</loc>", &["truncated", "xml"])]
    #[case::mismatched_end("<urlset><url></loc></urlset>", &["xml"])]
    #[case::stray_close("<urlset></urlset></url>", &["truncated", "xml"])]
    fn malformed_documents_are_rejected(#[case] xml: &str, #[case] accepted: &[&str]) {
        let err = decode_urlset(xml).unwrap_err();
        assert!(accepted.contains(&error_kind(&err)), "got: {err}");
    }

    #[test]
    fn decodes_index_entries() {
        let xml = r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://e.com/sitemaps/a-en.xml</loc><lastmod>2026-01-01T00:00:00.000Z</lastmod></sitemap>
  <sitemap><loc>https://e.com/sitemaps/b-en.xml</loc></sitemap>
</sitemapindex>"#;
        let entries = decode_index(xml).expect("decode");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].lastmod, None);
        assert!(decode_urlset(xml).is_err(), "index is not a urlset");
    }
}
