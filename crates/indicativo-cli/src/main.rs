use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use indicativo_report::{build_document, BuildOptions};
use indicativo_store::{Dataset, InMemoryStore, SnapshotListFilter, SnapshotStore};

#[derive(Parser, Debug)]
#[command(
    name = "indicativo",
    about = "Render captured planning snapshots as Plan Indicativo XLSX documents"
)]
struct Args {
    /// Dataset fixture: captured snapshots plus the live lookup tables.
    #[arg(long)]
    dataset: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the document for one snapshot and write it to disk.
    Generate {
        /// Snapshot id to render.
        #[arg(long)]
        snapshot: i64,

        /// Output path; defaults to the attachment filename in the
        /// current directory.
        #[arg(long)]
        out: Option<PathBuf>,

        /// First reporting year; defaults to the snapshot's capture year.
        #[arg(long)]
        first_year: Option<i32>,
    },
    /// List captured snapshots, optionally within a date range.
    List {
        /// Inclusive lower bound (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Inclusive upper bound (YYYY-MM-DD).
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let store = load_store(&args.dataset)?;

    match args.command {
        Command::Generate {
            snapshot,
            out,
            first_year,
        } => {
            let options = BuildOptions { first_year };
            let download = build_document(&store, &store, snapshot, &options)
                .with_context(|| format!("generating document for snapshot {snapshot}"))?;
            let out = out.unwrap_or_else(|| PathBuf::from(&download.filename));
            fs::write(&out, &download.bytes)
                .with_context(|| format!("writing {}", out.display()))?;
            info!(snapshot, path = %out.display(), bytes = download.bytes.len(), "document written");
            println!("{}", out.display());
        }
        Command::List { from, to } => {
            let filter = SnapshotListFilter {
                from: from.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc()),
                to: to.and_then(|d| d.and_hms_opt(23, 59, 59)).map(|dt| dt.and_utc()),
            };
            for summary in store.list(&filter)? {
                println!("{}\t{}", summary.id, summary.captured_at.to_rfc3339());
            }
        }
    }
    Ok(())
}

fn load_store(path: &PathBuf) -> Result<InMemoryStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading dataset {}", path.display()))?;
    let dataset: Dataset =
        serde_json::from_str(&raw).with_context(|| format!("parsing dataset {}", path.display()))?;
    InMemoryStore::from_dataset(dataset).context("loading dataset into the in-memory store")
}
