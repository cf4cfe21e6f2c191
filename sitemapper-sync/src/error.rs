//! Error types for sitemapper-sync.

use std::path::PathBuf;

use thiserror::Error;

use sitemapper_codec::CodecError;

/// Errors that abort a run. Fetch failures and unreadable persisted files
/// are recovered inside the engine and never surface here.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Run state could not be serialized.
    #[error("run state JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A sitemap document could not be encoded.
    #[error("sitemap encoding error: {0}")]
    Codec(#[from] CodecError),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
