//! Import news documents from a legacy export into the SQLite store.
//!
//! Accepts a JSON array or newline-delimited JSON as produced by the old
//! document store's export tools. Every document is normalized onto the
//! current record schema; ids and timestamps are preserved, so re-running
//! an import skips records that are already present.
//!
//! # Usage
//!
//! ```bash
//! import-legacy --input news-export.json --db news.db
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bulletin_core::{NewsStore, parse_legacy_export};

/// Import a legacy news export.
#[derive(Parser, Debug)]
#[command(name = "import-legacy")]
#[command(about = "Import news documents from a legacy export", long_about = None)]
struct Args {
    /// Export file (JSON array or JSONL).
    #[arg(short, long)]
    input: PathBuf,

    /// SQLite database to import into.
    #[arg(long, env = "NEWS_DB_PATH", default_value = "news.db")]
    db: PathBuf,
}

#[derive(Debug, Default)]
struct Stats {
    imported: usize,
    skipped: usize,
    invalid: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let docs = parse_legacy_export(&text)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    let store = NewsStore::open(&args.db)
        .with_context(|| format!("Failed to open {}", args.db.display()))?;

    tracing::info!(documents = docs.len(), db = %args.db.display(), "importing legacy export");

    let mut stats = Stats::default();
    for (idx, doc) in docs.into_iter().enumerate() {
        let record = match doc.into_record() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(index = idx, error = %e, "skipping invalid document");
                stats.invalid += 1;
                continue;
            }
        };

        if store.import(&record)? {
            tracing::debug!(news_id = %record.id, "imported");
            stats.imported += 1;
        } else {
            tracing::debug!(news_id = %record.id, "already present");
            stats.skipped += 1;
        }
    }

    tracing::info!(
        imported = stats.imported,
        skipped = stats.skipped,
        invalid = stats.invalid,
        total = store.count()?,
        "legacy import complete"
    );

    Ok(())
}
