use std::path::Path;

use rusqlite::Connection;

use crate::fmt::amount_value;
use crate::models::Receipt;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS receipts (
    id TEXT PRIMARY KEY,
    created_at TEXT,
    date TEXT,
    vendor TEXT,
    total REAL,
    tax REAL,
    image_path TEXT,
    raw_text TEXT
);
";

/// A row as read back from the relational mirror.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorRow {
    pub id: String,
    pub created_at: String,
    pub date: String,
    pub vendor: String,
    pub total: Option<f64>,
    pub tax: Option<f64>,
    pub image_path: String,
    pub raw_text: String,
}

impl MirrorRow {
    /// Same content as the ledger row, with amounts compared numerically.
    pub fn agrees_with(&self, r: &Receipt) -> bool {
        self.id == r.id
            && self.created_at == r.created_at
            && self.date == r.date
            && self.vendor == r.vendor
            && self.total == amount_value(&r.total)
            && self.tax == amount_value(&r.tax)
            && self.image_path == r.image_path
            && self.raw_text == r.raw_text
    }
}

/// SQLite copy of the ledger. Disposable: every rebuild replaces all rows.
pub struct Mirror {
    conn: Connection,
}

pub fn get_connection(db_path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

impl Mirror {
    pub fn open(db_path: &Path) -> rusqlite::Result<Self> {
        let conn = get_connection(db_path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Delete every row and insert `rows` in one transaction.
    pub fn rebuild(&mut self, rows: &[Receipt]) -> rusqlite::Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM receipts", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO receipts (id, created_at, date, vendor, total, tax, image_path, raw_text) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for r in rows {
                stmt.execute(rusqlite::params![
                    r.id,
                    r.created_at,
                    r.date,
                    r.vendor,
                    amount_value(&r.total),
                    amount_value(&r.tax),
                    r.image_path,
                    r.raw_text,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(rows = rows.len(), "mirror rebuilt");
        Ok(())
    }

    pub fn load_all(&self) -> rusqlite::Result<Vec<MirrorRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, date, vendor, total, tax, image_path, raw_text FROM receipts ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(MirrorRow {
                    id: row.get(0)?,
                    created_at: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    date: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    vendor: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    total: row.get(4)?,
                    tax: row.get(5)?,
                    image_path: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                    raw_text: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_mirror() -> (tempfile::TempDir, Mirror) {
        let dir = tempfile::tempdir().unwrap();
        let mirror = Mirror::open(&dir.path().join("test.db")).unwrap();
        (dir, mirror)
    }

    fn row(id: &str, total: &str) -> Receipt {
        Receipt {
            id: id.into(),
            created_at: "2024-01-05T10:00:00".into(),
            date: "2024-01-05".into(),
            vendor: "Acme".into(),
            total: total.into(),
            tax: String::new(),
            image_path: String::new(),
            raw_text: "ACME".into(),
        }
    }

    #[test]
    fn test_open_creates_table() {
        let (_dir, mirror) = test_mirror();
        let name: String = mirror
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type='table' AND name='receipts'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(name, "receipts");
    }

    #[test]
    fn test_open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        Mirror::open(&path).unwrap();
        Mirror::open(&path).unwrap();
    }

    #[test]
    fn test_rebuild_replaces_all_rows() {
        let (_dir, mut mirror) = test_mirror();
        mirror.rebuild(&[row("a", "1.00"), row("b", "2.00")]).unwrap();
        mirror.rebuild(&[row("c", "3.00")]).unwrap();
        let rows = mirror.load_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "c");
        assert_eq!(rows[0].total, Some(3.0));
    }

    #[test]
    fn test_rows_agree_with_ledger_after_rebuild() {
        let (_dir, mut mirror) = test_mirror();
        let ledger = vec![row("a", "$1,234.5"), row("b", "1234.50"), row("c", "n/a")];
        mirror.rebuild(&ledger).unwrap();
        let rows = mirror.load_all().unwrap();
        for (m, r) in rows.iter().zip(&ledger) {
            assert!(m.agrees_with(r), "{} disagrees", r.id);
        }
        let mut edited = ledger[1].clone();
        edited.vendor = "Globex".into();
        assert!(!rows[1].agrees_with(&edited));
    }

    #[test]
    fn test_non_numeric_amounts_are_null() {
        let (_dir, mut mirror) = test_mirror();
        mirror.rebuild(&[row("a", ""), row("b", "twelve")]).unwrap();
        let rows = mirror.load_all().unwrap();
        assert!(rows.iter().all(|r| r.total.is_none() && r.tax.is_none()));
        assert_eq!(rows.len(), 2);
    }
}
