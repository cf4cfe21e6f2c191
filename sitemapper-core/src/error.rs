//! Error types for sitemapper-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving settings or loading the content catalog.
///
/// Every variant is fatal: the binary aborts before touching the output
/// directory or the CMS.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required settings were not provided.
    #[error("missing required settings: {}", names.join(", "))]
    Missing { names: Vec<&'static str> },

    /// A setting was present but unusable.
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    /// Catalog file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog YAML parse error. Includes file path and line context from serde_yaml.
    #[error("failed to parse catalog at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The catalog declares kinds that cannot coexist.
    #[error("invalid content catalog: {0}")]
    Catalog(String),
}

/// Errors from URL construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// Collection URLs need a slug; the record must be skipped upstream.
    #[error("collection '{path_prefix}' entry has no slug")]
    MissingSlug { path_prefix: String },

    /// Collection slugs are exactly one path segment.
    #[error("collection '{path_prefix}' slug '{slug}' contains '/'")]
    NestedSlug { path_prefix: String, slug: String },
}

pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}
