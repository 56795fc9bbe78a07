use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;

use crate::error::{ReceiptError, Result};
use crate::fmt::{amount_value, normalize_amount};
use crate::ledger::Ledger;
use crate::mirror::{Mirror, MirrorRow};
use crate::models::{Column, NewReceipt, Receipt, ReceiptUpdate, Summary};

/// Receipt persistence over the CSV ledger and an optional SQLite mirror.
///
/// Every call reads the whole ledger. Mutations rewrite the ledger and then
/// rebuild the mirror from it. Mutating methods take `&mut self`; share a
/// store between threads by wrapping it in a single `Mutex`.
pub struct ReceiptStore {
    ledger: Ledger,
    mirror: Option<Mirror>,
}

impl ReceiptStore {
    pub fn open(ledger_path: &Path, mirror_path: Option<&Path>) -> Result<Self> {
        let ledger = Ledger::new(ledger_path);
        ledger.ensure()?;
        let mirror = match mirror_path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                Some(Mirror::open(path)?)
            }
            None => None,
        };
        Ok(Self { ledger, mirror })
    }

    pub fn ledger_path(&self) -> &Path {
        self.ledger.path()
    }

    pub fn has_mirror(&self) -> bool {
        self.mirror.is_some()
    }

    /// Filter by a case-insensitive substring of vendor, raw text or date,
    /// then stable-sort by the string value of `sort_by`.
    pub fn list_receipts(
        &self,
        search: Option<&str>,
        sort_by: Column,
        descending: bool,
    ) -> Result<Vec<Receipt>> {
        let mut rows = self.ledger.load()?;
        if let Some(needle) = search.filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            rows.retain(|r| r.matches(&needle));
        }
        if descending {
            rows.sort_by(|a, b| b.field(sort_by).cmp(a.field(sort_by)));
        } else {
            rows.sort_by(|a, b| a.field(sort_by).cmp(b.field(sort_by)));
        }
        Ok(rows)
    }

    pub fn get_receipt(&self, id: &str) -> Result<Option<Receipt>> {
        Ok(self.ledger.load()?.into_iter().find(|r| r.id == id))
    }

    pub fn add_receipt(&mut self, fields: NewReceipt) -> Result<Receipt> {
        let mut rows = self.ledger.load()?;
        let id = match fields.id {
            Some(id) if rows.iter().any(|r| r.id == id) => {
                return Err(ReceiptError::DuplicateId(id));
            }
            Some(id) => id,
            None => uuid::Uuid::new_v4().to_string(),
        };
        let receipt = Receipt {
            id,
            created_at: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            date: fields.date.unwrap_or_default(),
            vendor: fields.vendor.unwrap_or_default(),
            total: normalize_amount(fields.total.as_deref()),
            tax: normalize_amount(fields.tax.as_deref()),
            image_path: fields.image_path.unwrap_or_default(),
            raw_text: fields.raw_text.unwrap_or_default(),
        };
        rows.push(receipt.clone());
        self.commit(&rows, &receipt.id)?;
        tracing::info!(id = %receipt.id, vendor = %receipt.vendor, "receipt added");
        Ok(receipt)
    }

    /// Replace the supplied fields of one receipt. `id` and `created_at`
    /// never change. Returns `None` without writing when `id` is unknown.
    pub fn update_receipt(&mut self, id: &str, updates: ReceiptUpdate) -> Result<Option<Receipt>> {
        let mut rows = self.ledger.load()?;
        let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(date) = updates.date {
            row.date = date;
        }
        if let Some(vendor) = updates.vendor {
            row.vendor = vendor;
        }
        if let Some(total) = updates.total {
            row.total = normalize_amount(Some(total.as_str()));
        }
        if let Some(tax) = updates.tax {
            row.tax = normalize_amount(Some(tax.as_str()));
        }
        if let Some(raw_text) = updates.raw_text {
            row.raw_text = raw_text;
        }
        if let Some(image_path) = updates.image_path {
            row.image_path = image_path;
        }
        let updated = row.clone();
        self.commit(&rows, id)?;
        tracing::info!(id = %id, "receipt updated");
        Ok(Some(updated))
    }

    /// Re-derive the mirror from the ledger. Returns the row count.
    pub fn rebuild_mirror(&mut self) -> Result<usize> {
        let rows = self.ledger.load()?;
        if let Some(mirror) = self.mirror.as_mut() {
            mirror.rebuild(&rows)?;
        }
        Ok(rows.len())
    }

    pub fn mirror_rows(&self) -> Result<Option<Vec<MirrorRow>>> {
        match &self.mirror {
            Some(mirror) => Ok(Some(mirror.load_all()?)),
            None => Ok(None),
        }
    }

    /// Ids whose mirror row is missing, extra, or differs from the ledger.
    /// `None` when the store has no mirror.
    pub fn mirror_drift(&self) -> Result<Option<Vec<String>>> {
        let Some(mirror_rows) = self.mirror_rows()? else {
            return Ok(None);
        };
        let ledger = self.ledger.load()?;
        let mut by_id: HashMap<&str, &MirrorRow> =
            mirror_rows.iter().map(|m| (m.id.as_str(), m)).collect();
        let mut drift = Vec::new();
        for r in &ledger {
            match by_id.remove(r.id.as_str()) {
                Some(m) if m.agrees_with(r) => {}
                _ => drift.push(r.id.clone()),
            }
        }
        drift.extend(by_id.into_keys().map(str::to_string));
        drift.sort();
        Ok(Some(drift))
    }

    /// Count and sums for the dashboard. Non-numeric amounts count as zero.
    pub fn summary(&self) -> Result<Summary> {
        let rows = self.ledger.load()?;
        Ok(Summary {
            count: rows.len(),
            total_sum: rows.iter().filter_map(|r| amount_value(&r.total)).sum(),
            tax_sum: rows.iter().filter_map(|r| amount_value(&r.tax)).sum(),
        })
    }

    /// Copy the ledger file to `dest`. Returns the bytes copied.
    pub fn export_ledger(&self, dest: &Path) -> Result<u64> {
        self.ledger.copy_to(dest)
    }

    /// Ledger first; a mirror failure after that is reported as committed.
    fn commit(&mut self, rows: &[Receipt], id: &str) -> Result<()> {
        self.ledger.write(rows)?;
        if let Some(mirror) = self.mirror.as_mut() {
            if let Err(source) = mirror.rebuild(rows) {
                tracing::warn!(id = %id, error = %source, "mirror rebuild failed; ledger is current");
                return Err(ReceiptError::MirrorRebuild {
                    id: id.to_string(),
                    source,
                });
            }
        }
        Ok(())
    }
}
