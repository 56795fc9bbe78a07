use colored::Colorize;

use crate::error::Result;
use crate::fmt::money;

use super::open_store;

pub fn run(data_dir: Option<&str>) -> Result<()> {
    let (_, layout, store) = open_store(data_dir)?;
    let summary = store.summary()?;

    println!("Data dir:   {}", layout.root.display());
    println!("Ledger:     {}", store.ledger_path().display());
    match store.mirror_drift()? {
        Some(drift) => {
            println!("Mirror:     {}", layout.mirror().display());
            if !drift.is_empty() {
                println!(
                    "            {} ({} receipts differ); run `receipts rebuild-mirror`",
                    "out of date".yellow().bold(),
                    drift.len()
                );
                for id in &drift {
                    println!("              {id}");
                }
            }
        }
        None => println!("Mirror:     (disabled)"),
    }

    println!();
    println!("Receipts:   {}", summary.count);
    println!("Total:      {}", money(summary.total_sum));
    println!("Tax:        {}", money(summary.tax_sum));
    Ok(())
}
