pub mod export;
pub mod extract;
pub mod init;
pub mod mirror;
pub mod receipts;
pub mod scan;
pub mod status;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::error::Result;
use crate::models::Column;
use crate::settings::{load_settings, resolve_layout, DataLayout, Settings};
use crate::store::ReceiptStore;

#[derive(Parser)]
#[command(name = "receipts", version, about = "Capture receipts into a CSV ledger with a SQLite mirror.")]
pub struct Cli {
    /// Use this data directory instead of the configured one
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save settings and create the ledger, mirror and image directory.
    Init,
    /// Recognize a receipt image, extract its fields and store it.
    Scan {
        /// Path to the receipt image
        image: String,
        /// Use text recognized elsewhere instead of running tesseract
        #[arg(long = "text-file")]
        text_file: Option<String>,
    },
    /// Add a receipt by hand.
    Add {
        #[arg(long)]
        vendor: Option<String>,
        /// Transaction date, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        total: Option<String>,
        #[arg(long)]
        tax: Option<String>,
        #[arg(long = "raw-text")]
        raw_text: Option<String>,
        /// Image path to record with the receipt
        #[arg(long)]
        image: Option<String>,
        /// Explicit id (default: a generated UUID)
        #[arg(long)]
        id: Option<String>,
    },
    /// List receipts.
    List {
        /// Case-insensitive match on vendor, recognized text or date
        #[arg(long)]
        search: Option<String>,
        /// Column to sort by
        #[arg(long, default_value = "created_at")]
        sort: Column,
        /// Sort ascending (default is descending)
        #[arg(long)]
        asc: bool,
    },
    /// Show every field of one receipt.
    Show {
        id: String,
    },
    /// Correct fields of a receipt. Only the given flags change.
    Edit {
        id: String,
        #[arg(long)]
        vendor: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        total: Option<String>,
        #[arg(long)]
        tax: Option<String>,
        #[arg(long = "raw-text")]
        raw_text: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Run field extraction on a text file and print the result as JSON.
    Extract {
        /// File holding recognized text
        file: String,
    },
    /// Copy the ledger CSV.
    Export {
        /// Output path (default: <data_dir>/exports/receipts-YYYYMMDD.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Rebuild the SQLite mirror from the ledger.
    RebuildMirror,
    /// Show paths, receipt count and totals.
    Status,
    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Settings, resolved layout and an open store.
pub(crate) fn open_store(data_dir: Option<&str>) -> Result<(Settings, DataLayout, ReceiptStore)> {
    let settings = load_settings();
    let layout = resolve_layout(&settings, data_dir);
    let mirror = settings.mirror.then(|| layout.mirror());
    let store = ReceiptStore::open(&layout.ledger(), mirror.as_deref())?;
    Ok((settings, layout, store))
}

/// A mirror failure after the ledger write is a warning, not a failed command.
pub(crate) fn tolerate_stale_mirror<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_committed() => {
            eprintln!("{} {e}", "Warning:".yellow().bold());
            eprintln!("Run `receipts rebuild-mirror` to bring the mirror up to date.");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
