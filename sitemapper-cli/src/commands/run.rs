//! `sitemapper run`: fetch content and write the sitemaps.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;

use sitemapper_core::Settings;
use sitemapper_sync::{pipeline, RunSummary, WriteResult};

use super::config::ConfigArgs;

/// Arguments for `sitemapper run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Show what would be written without touching the output directory.
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let settings =
            Settings::resolve(self.config.into_raw()).context("invalid configuration")?;
        tracing::debug!(?settings, "resolved settings");

        let client = sitemapper_cms::connect(&settings.cms);
        let summary = pipeline::run(&settings, &client, Utc::now(), self.dry_run)
            .context("sitemap generation failed")?;
        print_summary(&summary);
        Ok(())
    }
}

fn print_summary(summary: &RunSummary) {
    let prefix = if summary.dry_run { "[dry-run] " } else { "" };
    let report = &summary.report;
    let written = summary
        .writes
        .results
        .iter()
        .filter(|r| matches!(r, WriteResult::Written { .. } | WriteResult::WouldWrite { .. }))
        .count();
    let unchanged = summary
        .writes
        .results
        .iter()
        .filter(|r| matches!(r, WriteResult::Unchanged { .. }))
        .count();

    println!(
        "{prefix}{} {} run: {} URLs in {} file(s) ({} written, {} unchanged)",
        "✓".green().bold(),
        summary.mode,
        summary.total_urls,
        summary.writes.files.len(),
        written,
        unchanged,
    );
    println!(
        "  +{} inserted  ~{} updated  -{} removed  {} skipped",
        report.inserted, report.updated, report.removed, report.skipped
    );
    if report.fetch_failures > 0 {
        println!(
            "  {}",
            format!(
                "{} fetch(es) failed; affected content was left as is",
                report.fetch_failures
            )
            .yellow()
        );
    }

    for r in &summary.writes.results {
        match r {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
            WriteResult::Removed { path } => println!("  {}  {}", "✗".red(), path.display()),
            WriteResult::WouldRemove { path } => println!("  -  {}", path.display()),
        }
    }

    match (summary.saved_timestamp, summary.state_saved) {
        (Some(ts), true) => println!("  state: last successful run {}", ts.to_rfc3339()),
        (Some(ts), false) => println!("  state: would record {}", ts.to_rfc3339()),
        (None, _) => println!("  state: unchanged"),
    }
}
