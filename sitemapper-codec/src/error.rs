//! Error types for sitemapper-codec.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while encoding or decoding sitemap documents.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The document is not well-formed XML.
    #[error("XML syntax error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// Well-formed XML, but not the expected document type.
    #[error("expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    /// The document ended before its elements were closed (or had no root).
    #[error("document ended unexpectedly")]
    Truncated,

    /// Serializing into the output buffer failed.
    #[error("write error: {0}")]
    Write(#[from] std::io::Error),

    /// Reading a sitemap file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
