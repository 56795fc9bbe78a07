use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiptError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The ledger could not be replaced. The previous ledger is untouched.
    #[error("Could not write ledger {}: {source}", .path.display())]
    LedgerWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ledger was written but the mirror is stale until the next rebuild.
    #[error("Receipt {id} saved, but the mirror rebuild failed: {source}")]
    MirrorRebuild {
        id: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("A receipt with id {0} already exists")]
    DuplicateId(String),

    #[error("Receipt not found: {0}")]
    NotFound(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl ReceiptError {
    /// True when the ledger holds the change despite the error.
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::MirrorRebuild { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReceiptError>;
