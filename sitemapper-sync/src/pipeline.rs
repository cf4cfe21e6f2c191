//! Shared run entrypoint: load state, reconcile, write, persist state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use sitemapper_cms::ContentSource;
use sitemapper_codec::read_urlset_file;
use sitemapper_core::{Mode, Settings, SitemapUrl};

use crate::engine::{ReconcileReport, Reconciler};
use crate::error::SyncError;
use crate::run_state::{self, RunState};
use crate::writer::{self, existing_sitemap_files, WriteReport};

/// Outcome of one run.
#[derive(Debug)]
pub struct RunSummary {
    pub mode: Mode,
    pub dry_run: bool,
    pub report: ReconcileReport,
    pub writes: WriteReport,
    pub total_urls: usize,
    /// Timestamp recorded for the next incremental run, if the state changed.
    pub saved_timestamp: Option<DateTime<Utc>>,
    pub state_saved: bool,
}

/// Run one synchronization.
///
/// `now` is the run start; it becomes both the heartbeat `lastmod` and the
/// next `lastSuccessfulRunTimestamp`.
pub fn run<S: ContentSource + ?Sized>(
    settings: &Settings,
    source: &S,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<RunSummary, SyncError> {
    let mode = settings.mode;
    let output = &settings.output;
    let state_path = output.state_path();
    tracing::info!(
        "starting sitemap generation in {mode} mode{}",
        if dry_run { " (dry run)" } else { "" }
    );

    let (prior, seed) = match mode {
        Mode::Full => {
            if !dry_run && run_state::remove_at(&state_path)? {
                tracing::info!("full mode: cleared previous run state");
            }
            (RunState::default(), Vec::new())
        }
        Mode::Incremental => {
            let prior = run_state::load_at(&state_path);
            match prior.last_successful_run_timestamp {
                Some(ts) => tracing::info!("incremental mode: last successful run at {ts}"),
                None => tracing::warn!(
                    "incremental mode: no last run timestamp; fetching everything"
                ),
            }
            let seed = load_existing(settings)?;
            (prior, seed)
        }
    };

    let outcome = Reconciler::new(source, &settings.urls, &settings.catalog, now)
        .with_single_grace(settings.single_grace)
        .run(mode, &prior, seed);

    let writes = writer::write_sitemaps(
        &outcome.urls,
        output,
        settings.urls.base(),
        now,
        dry_run,
    )?;

    let next = next_state(mode, &prior, &outcome.report, outcome.single_misses, now);
    let (state_saved, saved_timestamp) = match next {
        Some(state) if !dry_run => {
            run_state::save_at(&state_path, &state)?;
            tracing::info!("saved run state to {}", state_path.display());
            (true, state.last_successful_run_timestamp)
        }
        Some(state) => {
            tracing::info!("[dry-run] would save run state");
            (false, state.last_successful_run_timestamp)
        }
        None => {
            tracing::info!("nothing new fetched; run state left as is");
            (false, None)
        }
    };

    Ok(RunSummary {
        mode,
        dry_run,
        total_urls: outcome.urls.len(),
        report: outcome.report,
        writes,
        saved_timestamp,
        state_saved,
    })
}

/// State to persist after a run, or `None` when the file should stay as is.
///
/// The timestamp advances to `now` in full mode, when something new was
/// fetched, or when there was no prior timestamp. Otherwise the old
/// timestamp is kept, and the file is only rewritten if the miss counters
/// moved.
pub fn next_state(
    mode: Mode,
    prior: &RunState,
    report: &ReconcileReport,
    single_misses: BTreeMap<String, u32>,
    now: DateTime<Utc>,
) -> Option<RunState> {
    let advance = mode == Mode::Full
        || report.fetched_something_new
        || prior.last_successful_run_timestamp.is_none();
    if advance {
        return Some(RunState {
            last_successful_run_timestamp: Some(now),
            single_misses,
        });
    }
    if single_misses != prior.single_misses {
        return Some(RunState {
            last_successful_run_timestamp: prior.last_successful_run_timestamp,
            single_misses,
        });
    }
    None
}

/// Records of every previously written group file. Unreadable files
/// contribute nothing.
fn load_existing(settings: &Settings) -> Result<Vec<SitemapUrl>, SyncError> {
    let files = existing_sitemap_files(&settings.output.dir, &settings.output.index_file)?;
    let mut urls = Vec::new();
    for path in &files {
        urls.extend(read_urlset_file(path));
    }
    tracing::debug!("read {} URLs from {} files", urls.len(), files.len());
    Ok(urls)
}
