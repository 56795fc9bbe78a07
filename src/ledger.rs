use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{ReceiptError, Result};
use crate::models::{Receipt, LEDGER_HEADERS};

/// The authoritative CSV file. Every write replaces the whole file.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and a header-only file if missing.
    pub fn ensure(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if !self.path.exists() {
            self.write(&[])?;
        }
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<Receipt>> {
        let file = File::open(&self.path)?;
        let mut rdr = csv::Reader::from_reader(BufReader::new(file));
        let rows = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<Receipt>, _>>()?;
        Ok(rows)
    }

    /// Write all rows to a sibling temp file, then rename it over the ledger
    /// so readers only ever see a complete file.
    pub fn write(&self, rows: &[Receipt]) -> Result<()> {
        let tmp = self.path.with_extension("csv.tmp");
        let written = write_rows(&tmp, rows).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(source) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(ReceiptError::LedgerWrite {
                path: self.path.clone(),
                source,
            });
        }
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "ledger rewritten");
        Ok(())
    }

    pub fn copy_to(&self, dest: &Path) -> Result<u64> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::copy(&self.path, dest)?)
    }
}

fn write_rows(path: &Path, rows: &[Receipt]) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    wtr.write_record(LEDGER_HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    let mut file = wtr.into_inner().map_err(|e| e.into_error())?;
    file.flush()?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, raw_text: &str) -> Receipt {
        Receipt {
            id: id.into(),
            created_at: "2024-01-05T10:00:00".into(),
            date: "2024-01-05".into(),
            vendor: "Acme, Inc.".into(),
            total: "12.34".into(),
            tax: String::new(),
            image_path: "images/a.jpg".into(),
            raw_text: raw_text.into(),
        }
    }

    #[test]
    fn test_ensure_writes_header_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("data").join("receipts.csv"));
        ledger.ensure().unwrap();
        let content = std::fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(content.trim_end(), "id,created_at,date,vendor,total,tax,image_path,raw_text");
        assert!(ledger.load().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("receipts.csv"));
        ledger.write(&[row("a", "x")]).unwrap();
        ledger.ensure().unwrap();
        assert_eq!(ledger.load().unwrap().len(), 1);
    }

    #[test]
    fn test_embedded_delimiters_and_newlines_survive() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("receipts.csv"));
        let rows = vec![row("a", "ACME, INC.\n\"Total\": 12.34\n"), row("b", "")];
        ledger.write(&rows).unwrap();
        assert_eq!(ledger.load().unwrap(), rows);
        assert!(!dir.path().join("receipts.csv.tmp").exists());
    }

    #[test]
    fn test_failed_write_leaves_previous_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("receipts.csv"));
        ledger.write(&[row("a", "x")]).unwrap();
        // A directory squatting on the temp path makes the write fail.
        std::fs::create_dir(dir.path().join("receipts.csv.tmp")).unwrap();
        let err = ledger.write(&[row("a", "x"), row("b", "y")]).unwrap_err();
        assert!(matches!(err, ReceiptError::LedgerWrite { .. }));
        assert_eq!(ledger.load().unwrap().len(), 1);
    }

    #[test]
    fn test_reads_missing_optional_columns_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipts.csv");
        std::fs::write(&path, "id,created_at,vendor\nr1,2024-01-01T00:00:00,Deli\n").unwrap();
        let rows = Ledger::new(&path).load().unwrap();
        assert_eq!(rows[0].vendor, "Deli");
        assert_eq!(rows[0].total, "");
        assert_eq!(rows[0].raw_text, "");
    }
}
