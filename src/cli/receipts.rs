use comfy_table::{Cell, Table};

use crate::error::{ReceiptError, Result};
use crate::models::{Column, NewReceipt, Receipt, ReceiptUpdate};

use super::{open_store, tolerate_stale_mirror};

pub fn add(data_dir: Option<&str>, fields: NewReceipt) -> Result<()> {
    let (_, _, mut store) = open_store(data_dir)?;
    if let Some(receipt) = tolerate_stale_mirror(store.add_receipt(fields))? {
        println!("Added receipt {}", receipt.id);
    }
    Ok(())
}

pub fn list(data_dir: Option<&str>, search: Option<&str>, sort: Column, asc: bool) -> Result<()> {
    let (_, _, store) = open_store(data_dir)?;
    let rows = store.list_receipts(search, sort, !asc)?;
    if rows.is_empty() {
        println!("No receipts found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Created", "Date", "Vendor", "Total", "Tax"]);
    for r in &rows {
        table.add_row(vec![
            Cell::new(&r.id),
            Cell::new(short_timestamp(&r.created_at)),
            Cell::new(&r.date),
            Cell::new(&r.vendor),
            Cell::new(&r.total),
            Cell::new(&r.tax),
        ]);
    }
    println!("Receipts ({})\n{table}", rows.len());
    Ok(())
}

pub fn show(data_dir: Option<&str>, id: &str) -> Result<()> {
    let (_, _, store) = open_store(data_dir)?;
    let receipt = store
        .get_receipt(id)?
        .ok_or_else(|| ReceiptError::NotFound(id.to_string()))?;
    print_receipt(&receipt);
    Ok(())
}

pub fn edit(data_dir: Option<&str>, id: &str, updates: ReceiptUpdate) -> Result<()> {
    let (_, _, mut store) = open_store(data_dir)?;
    if store.get_receipt(id)?.is_none() {
        return Err(ReceiptError::NotFound(id.to_string()));
    }
    if updates.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }
    let updated = tolerate_stale_mirror(store.update_receipt(id, updates))?;
    match updated {
        Some(Some(receipt)) => print_receipt(&receipt),
        Some(None) => return Err(ReceiptError::NotFound(id.to_string())),
        None => {}
    }
    Ok(())
}

fn print_receipt(r: &Receipt) {
    println!("ID:         {}", r.id);
    println!("Created:    {}", r.created_at);
    println!("Date:       {}", r.date);
    println!("Vendor:     {}", r.vendor);
    println!("Total:      {}", r.total);
    println!("Tax:        {}", r.tax);
    println!("Image:      {}", r.image_path);
    println!("Text:");
    for line in r.raw_text.lines() {
        println!("  {line}");
    }
}

/// `2024-01-05T10:00:00.123456` -> `2024-01-05 10:00`
fn short_timestamp(ts: &str) -> String {
    match ts.get(..16) {
        Some(head) => head.replacen('T', " ", 1),
        None => ts.to_string(),
    }
}
