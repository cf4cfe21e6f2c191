//! Sitemapper keeps sitemap XML files in step with a Strapi CMS.
//!
//! # Usage
//!
//! ```text
//! sitemapper run [--mode full|incremental] [--dry-run] [config flags]
//! sitemapper status --output-dir <dir> [--json]
//! sitemapper catalog [--catalog <file>] [--json|--yaml]
//! ```
//!
//! Every config flag also reads an environment variable (`STRAPI_API_URL`,
//! `SITEMAP_OUTPUT_DIR`, ...); flags win.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{catalog::CatalogArgs, run::RunArgs, status::StatusArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "sitemapper",
    version,
    about = "Generate and incrementally update sitemaps from Strapi content",
    long_about = None,
)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch content and write sitemap files plus the sitemap index.
    Run(RunArgs),

    /// Show the state of an output directory.
    Status(StatusArgs),

    /// Print the effective content catalog.
    Catalog(CatalogArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Catalog(args) => args.run(),
    }
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
