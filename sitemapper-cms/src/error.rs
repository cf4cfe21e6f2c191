//! Error types for sitemapper-cms.

use thiserror::Error;

/// Failures talking to the CMS. None of these abort a run; the engine logs
/// them and treats the affected kind/language pair as having no data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("GET {url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    /// Connection, DNS, TLS or timeout failure.
    #[error("GET {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The response body could not be read.
    #[error("GET {url}: unreadable body: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The response JSON did not have the expected shape.
    #[error("unexpected response shape from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. })
    }
}
