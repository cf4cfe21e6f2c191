//! # sitemapper-sync
//!
//! Incremental reconciliation of CMS content with the sitemap files on disk.
//!
//! Call [`pipeline::run`] for a complete run; the individual merge steps live
//! in [`engine`] and the file layout in [`writer`].

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod run_state;
pub mod status;
pub mod url_set;
pub mod writer;

pub use engine::{ReconcileOutcome, ReconcileReport, Reconciler};
pub use error::SyncError;
pub use pipeline::{run, RunSummary};
pub use run_state::RunState;
pub use url_set::{Upsert, UrlSet};
pub use writer::{WriteReport, WriteResult};
