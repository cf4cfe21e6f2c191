//! `sitemapper status`: what an output directory currently holds.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use sitemapper_core::settings::{
    OutputSettings, DEFAULT_INDEX_FILE, DEFAULT_PUBLIC_PATH, DEFAULT_URL_LIMIT,
};
use sitemapper_sync::status::{check, format_datetime_age, StatusReport};

/// Arguments for `sitemapper status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Directory holding the sitemap files.
    #[arg(long, env = "SITEMAP_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// File name of the sitemap index.
    #[arg(long, env = "SITEMAP_INDEX_FILE", default_value = DEFAULT_INDEX_FILE)]
    pub index_file: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let output = OutputSettings {
            dir: self.output_dir,
            url_limit: DEFAULT_URL_LIMIT,
            index_file: self.index_file,
            public_path: DEFAULT_PUBLIC_PATH.to_string(),
        };
        let report = check(&output)
            .with_context(|| format!("status check failed for {}", output.dir.display()))?;

        if self.json {
            print_json(&report)?;
            return Ok(());
        }
        print_table(&report);
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusJson<'a> {
    #[serde(flatten)]
    report: &'a StatusReport,
    total_urls: usize,
    last_run_age: Option<String>,
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "file")]
    name: String,
    #[tabled(rename = "urls")]
    urls: String,
    #[tabled(rename = "note")]
    note: String,
}

fn print_json(report: &StatusReport) -> Result<()> {
    let payload = StatusJson {
        report,
        total_urls: report.total_urls(),
        last_run_age: report
            .last_successful_run
            .map(|ts| format_datetime_age(ts, Utc::now())),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(report: &StatusReport) {
    println!(
        "Sitemapper v{} | {} | {} file(s) | {} URLs",
        env!("CARGO_PKG_VERSION"),
        report.output_dir.display(),
        report.files.len(),
        report.total_urls(),
    );

    let last_run = match report.last_successful_run {
        Some(ts) => format!(
            "{} ago ({})",
            format_datetime_age(ts, Utc::now()),
            ts.to_rfc3339()
        )
        .green()
        .to_string(),
        None => "never".bright_black().to_string(),
    };
    println!("Last successful run: {last_run}");

    let index = if report.index_present {
        "present".green().to_string()
    } else {
        "missing".yellow().to_string()
    };
    println!("Index: {index}");

    if report.pending_single_removals > 0 {
        println!(
            "{}",
            format!(
                "{} single page(s) reported missing, awaiting removal",
                report.pending_single_removals
            )
            .yellow()
        );
    }

    if report.files.is_empty() {
        println!("No sitemap files found.");
        return;
    }

    let rows: Vec<FileRow> = report
        .files
        .iter()
        .map(|f| FileRow {
            name: f.name.clone(),
            urls: f.urls.map(|n| n.to_string()).unwrap_or_else(|| "?".into()),
            note: f.error.clone().unwrap_or_default(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if report.unreadable_files() > 0 {
        println!(
            "{}",
            "Unreadable files are dropped on the next incremental run; run in full mode to rebuild."
                .red()
        );
    }
}
