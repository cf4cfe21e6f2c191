//! Run state: when the last successful run started, plus single-kind miss
//! counters.
//!
//! Persisted as `sitemap_state.json` in the output directory. Writes use the
//! atomic `.tmp` + rename pattern. Older generators stored the timestamp as
//! epoch milliseconds; those files are still accepted.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, SyncError};

/// On-disk run state payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    pub last_successful_run_timestamp: Option<DateTime<Utc>>,
    /// Consecutive not-found observations per single-kind location.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub single_misses: BTreeMap<String, u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunStateCompat {
    #[serde(default)]
    last_successful_run_timestamp: Option<TimestampCompat>,
    #[serde(default)]
    single_misses: BTreeMap<String, u32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimestampCompat {
    Rfc3339(DateTime<Utc>),
    EpochMillis(i64),
}

impl TimestampCompat {
    fn into_datetime(self) -> Option<DateTime<Utc>> {
        match self {
            TimestampCompat::Rfc3339(ts) => Some(ts),
            TimestampCompat::EpochMillis(ms) => Utc.timestamp_millis_opt(ms).single(),
        }
    }
}

/// Parse a run state document.
pub fn parse(contents: &str) -> Result<RunState, serde_json::Error> {
    let compat: RunStateCompat = serde_json::from_str(contents)?;
    Ok(RunState {
        last_successful_run_timestamp: compat
            .last_successful_run_timestamp
            .and_then(TimestampCompat::into_datetime),
        single_misses: compat.single_misses,
    })
}

/// Load run state from `path`.
///
/// A missing file means "no prior run". An unreadable or corrupt file is
/// logged and treated the same way.
pub fn load_at(path: &Path) -> RunState {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return RunState::default(),
        Err(err) => {
            tracing::warn!("could not read {}: {err}", path.display());
            return RunState::default();
        }
    };
    match parse(&contents) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!("could not parse {}: {err}", path.display());
            RunState::default()
        }
    }
}

/// Save run state to `path` atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`.
pub fn save_at(path: &Path, state: &RunState) -> Result<(), SyncError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }
    let json = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// Delete the state file if present.
pub fn remove_at(path: &Path) -> Result<bool, SyncError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(io_err(path, err)),
    }
}
