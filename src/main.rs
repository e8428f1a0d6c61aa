// src/main.rs

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use static_couch::{builder_for_source, prepare_out_dir};

#[derive(Parser)]
#[command(name = "static-couch")]
#[command(author, version, about = "Materialize a read-only static-file mirror of a CouchDB-style document database", long_about = None)]
struct Cli {
    /// Source: a local directory of documents, or the HTTP(S) URL of a
    /// live database root
    source: String,

    /// Output directory for the mirror artifacts
    #[arg(long, default_value = "build")]
    out_dir: PathBuf,

    /// Permit a pre-existing output directory (its contents are overwritten)
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    prepare_out_dir(&cli.out_dir, cli.force)?;

    info!("building mirror from {} into {}", cli.source, cli.out_dir.display());
    let builder = builder_for_source(&cli.source)?;
    builder.build(&cli.out_dir)?;

    println!("Mirror written to {}", cli.out_dir.display());
    Ok(())
}
