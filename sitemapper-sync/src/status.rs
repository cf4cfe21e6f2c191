//! Output directory health: last run, index presence, per-file URL counts.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use sitemapper_codec::try_read_urlset_file;
use sitemapper_core::settings::OutputSettings;

use crate::run_state;
use crate::writer::existing_sitemap_files;
use crate::SyncError;

/// Health of one group file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub name: String,
    /// URL count, or `None` when the file failed to decode.
    pub urls: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Snapshot of an output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub output_dir: PathBuf,
    pub last_successful_run: Option<DateTime<Utc>>,
    pub pending_single_removals: usize,
    pub index_present: bool,
    pub files: Vec<FileStatus>,
}

impl StatusReport {
    pub fn total_urls(&self) -> usize {
        self.files.iter().filter_map(|f| f.urls).sum()
    }

    pub fn unreadable_files(&self) -> usize {
        self.files.iter().filter(|f| f.urls.is_none()).count()
    }
}

/// Inspect `output` without modifying it.
pub fn check(output: &OutputSettings) -> Result<StatusReport, SyncError> {
    let state = run_state::load_at(&output.state_path());
    let mut files = Vec::new();
    for path in existing_sitemap_files(&output.dir, &output.index_file)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let status = match try_read_urlset_file(&path) {
            Ok(urls) => FileStatus {
                name,
                urls: Some(urls.len()),
                error: None,
            },
            Err(err) => FileStatus {
                name,
                urls: None,
                error: Some(err.to_string()),
            },
        };
        files.push(status);
    }
    Ok(StatusReport {
        output_dir: output.dir.clone(),
        last_successful_run: state.last_successful_run_timestamp,
        pending_single_removals: state.single_misses.len(),
        index_present: output.index_path().is_file(),
        files,
    })
}

/// Format age from a chrono timestamp (run state `lastSuccessfulRunTimestamp`).
pub fn format_datetime_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(timestamp).num_seconds().max(0) as u64;
    format_seconds(age)
}

fn format_seconds(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}
