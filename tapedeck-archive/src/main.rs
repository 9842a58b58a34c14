//! Archive manifest generator (generate-manifest) - Main entry point
//!
//! Scans an assets directory and writes `archive-manifest.json` next to the files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tapedeck_archive::generator::{generate, write_manifest};
use tapedeck_archive::manifest::to_manifest_json;
use tapedeck_common::config::init_tracing;
use tracing::info;

/// Command-line arguments for generate-manifest
#[derive(Parser, Debug)]
#[command(name = "generate-manifest")]
#[command(about = "Build the archive manifest from an assets directory")]
#[command(version)]
struct Args {
    /// Assets directory to scan
    #[arg(default_value = "assets")]
    dir: PathBuf,

    /// Write the manifest here instead of into the assets directory ("-" for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level or filter directive
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref(), "tapedeck_archive=info");

    let items = generate(&args.dir)
        .with_context(|| format!("Failed to scan {}", args.dir.display()))?;

    let path = match &args.output {
        Some(path) if path.as_os_str() == "-" => {
            println!("{}", to_manifest_json(&items)?);
            return Ok(());
        }
        Some(path) => {
            std::fs::write(path, to_manifest_json(&items)?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path.clone()
        }
        None => write_manifest(&args.dir, &items).context("Failed to write manifest")?,
    };

    info!("Wrote {} items to {}", items.len(), path.display());
    Ok(())
}
