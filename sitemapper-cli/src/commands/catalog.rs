//! `sitemapper catalog`: print the effective content catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use sitemapper_core::{Catalog, KindShape};

/// Arguments for `sitemapper catalog`.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// YAML catalog file (built-in list when absent).
    #[arg(long, env = "SITEMAP_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long, conflicts_with = "yaml")]
    pub json: bool,

    /// Emit the catalog in its YAML file format.
    #[arg(long)]
    pub yaml: bool,
}

impl CatalogArgs {
    pub fn run(self) -> Result<()> {
        let catalog = match &self.catalog {
            Some(path) => Catalog::load_at(path)?,
            None => Catalog::builtin(),
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&catalog)
                    .context("failed to serialize catalog JSON")?
            );
        } else if self.yaml {
            print!("{}", catalog.to_yaml().context("failed to serialize catalog YAML")?);
        } else {
            print_table(&catalog);
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct KindRow {
    #[tabled(rename = "api slug")]
    api_slug: String,
    #[tabled(rename = "type")]
    kind: &'static str,
    #[tabled(rename = "path")]
    path: String,
    #[tabled(rename = "group")]
    group: String,
    #[tabled(rename = "priority")]
    priority: String,
    #[tabled(rename = "changefreq")]
    change_frequency: String,
    #[tabled(rename = "refresh")]
    refresh: &'static str,
}

fn print_table(catalog: &Catalog) {
    if catalog.is_empty() {
        println!("Catalog declares no content kinds.");
        return;
    }
    let rows: Vec<KindRow> = catalog
        .iter()
        .map(|kind| {
            let (label, path) = match &kind.shape {
                KindShape::Single { path_segment } => ("single", format!("/{path_segment}")),
                KindShape::Collection { path_prefix } => {
                    ("collection", format!("/{path_prefix}/{{slug}}"))
                }
            };
            KindRow {
                api_slug: kind.api_slug.clone(),
                kind: label,
                path,
                group: kind.group_base(),
                priority: kind.priority.clone(),
                change_frequency: kind.change_frequency.to_string(),
                refresh: if kind.always_refresh { "every run" } else { "" },
            }
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
