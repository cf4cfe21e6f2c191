//! Sitemap writer: partitions the authoritative set into group files and
//! writes the index.
//!
//! ## Protocol
//!
//! 1. Plan one or more files per group (`{stem}.xml` or `{stem}-N.xml`).
//! 2. Delete every `*.xml` in the output directory that is neither planned
//!    nor the index.
//! 3. Write each planned file to `<path>.tmp`, then rename. Files whose
//!    content is already identical are left untouched.
//! 4. Write the index, or delete it when no files were planned.
//!
//! In dry-run mode the same plan is computed and reported without touching
//! the filesystem.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use sitemapper_codec::{encode_index, encode_urlset, IndexEntry};
use sitemapper_core::settings::OutputSettings;
use sitemapper_core::{format_lastmod, SitemapUrl};

use crate::error::{io_err, SyncError};
use crate::url_set::UrlSet;

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File already had exactly this content.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
    /// Stale file deleted.
    Removed { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been deleted.
    WouldRemove { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path }
            | WriteResult::Removed { path }
            | WriteResult::WouldRemove { path } => path,
        }
    }
}

/// One planned sitemap file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub name: String,
    pub urls: Vec<SitemapUrl>,
}

/// Everything the writer did (or would do).
#[derive(Debug, Clone, Default)]
pub struct WriteReport {
    pub files: Vec<PlannedFile>,
    pub results: Vec<WriteResult>,
    /// Index written (or would be); `false` when it was removed or absent.
    pub index_written: bool,
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Split the set into files of at most `limit` URLs each.
///
/// A group that fits in one file is named `{stem}.xml`; a larger group
/// becomes `{stem}-1.xml`, `{stem}-2.xml`, ...
pub fn plan_files(set: &UrlSet, limit: usize) -> Vec<PlannedFile> {
    let limit = limit.max(1);
    let mut files = Vec::new();
    for (group, entries) in set.partition() {
        let stem = group.file_stem();
        let split = entries.len() > limit;
        for (i, chunk) in entries.chunks(limit).enumerate() {
            let name = if split {
                format!("{stem}-{}.xml", i + 1)
            } else {
                format!("{stem}.xml")
            };
            files.push(PlannedFile {
                name,
                urls: chunk.iter().map(|e| e.url.clone()).collect(),
            });
        }
    }
    files
}

/// Public location of a sitemap file as listed in the index.
pub fn public_url(site_base: &str, public_path: &str, file_name: &str) -> String {
    let site = site_base.trim_end_matches('/');
    let public_path = public_path.trim_matches('/');
    if public_path.is_empty() {
        format!("{site}/{file_name}")
    } else {
        format!("{site}/{public_path}/{file_name}")
    }
}

/// Every `*.xml` file in `dir` except the index, sorted by name.
/// A missing directory has no files.
pub fn existing_sitemap_files(dir: &Path, index_file: &str) -> Result<Vec<PathBuf>, SyncError> {
    let read = match std::fs::read_dir(dir) {
        Ok(read) => read,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(io_err(dir, err)),
    };
    let mut files = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let is_xml = path.extension().is_some_and(|ext| ext == "xml");
        let is_index = path.file_name().is_some_and(|name| name == index_file);
        if is_xml && !is_index && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write the whole set to `output.dir`.
pub fn write_sitemaps(
    set: &UrlSet,
    output: &OutputSettings,
    site_base: &str,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<WriteReport, SyncError> {
    let files = plan_files(set, output.url_limit);
    let mut results = Vec::new();

    if !dry_run {
        std::fs::create_dir_all(&output.dir).map_err(|e| io_err(&output.dir, e))?;
    }

    for stale in existing_sitemap_files(&output.dir, &output.index_file)? {
        let planned = stale
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| files.iter().any(|f| f.name == name));
        if !planned {
            results.push(remove_file(&stale, dry_run)?);
        }
    }

    for file in &files {
        let xml = encode_urlset(&file.urls)?;
        let result = atomic_write(&output.dir.join(&file.name), &xml, dry_run)?;
        if matches!(result, WriteResult::Written { .. } | WriteResult::WouldWrite { .. }) {
            tracing::debug!("{}: {} URLs", file.name, file.urls.len());
        }
        results.push(result);
    }

    let index_path = output.index_path();
    let index_written = if files.is_empty() {
        tracing::info!("no sitemap files generated; removing index if present");
        if index_path.exists() {
            results.push(remove_file(&index_path, dry_run)?);
        }
        false
    } else {
        let lastmod = format_lastmod(now);
        let entries: Vec<IndexEntry> = files
            .iter()
            .map(|f| IndexEntry {
                loc: public_url(site_base, &output.public_path, &f.name),
                lastmod: Some(lastmod.clone()),
            })
            .collect();
        let xml = encode_index(&entries)?;
        results.push(atomic_write(&index_path, &xml, dry_run)?);
        tracing::info!(
            "sitemap index {} lists {} file(s)",
            output.index_file,
            files.len()
        );
        true
    };

    Ok(WriteReport {
        files,
        results,
        index_written,
    })
}

fn remove_file(path: &Path, dry_run: bool) -> Result<WriteResult, SyncError> {
    if dry_run {
        tracing::info!("[dry-run] would remove: {}", path.display());
        return Ok(WriteResult::WouldRemove {
            path: path.to_path_buf(),
        });
    }
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(io_err(path, err)),
    }
    tracing::info!("removed: {}", path.display());
    Ok(WriteResult::Removed {
        path: path.to_path_buf(),
    })
}

/// Write `content` to `path` via a `.tmp` sibling and rename.
pub(crate) fn atomic_write(
    path: &Path,
    content: &str,
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    match std::fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(io_err(path, err)),
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
