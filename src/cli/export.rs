use std::path::PathBuf;

use crate::error::Result;

use super::open_store;

pub fn run(data_dir: Option<&str>, output: Option<&str>) -> Result<()> {
    let (_, layout, store) = open_store(data_dir)?;
    let dest = match output {
        Some(p) => PathBuf::from(p),
        None => {
            let date = chrono::Local::now().format("%Y%m%d");
            layout.exports().join(format!("receipts-{date}.csv"))
        }
    };
    store.export_ledger(&dest)?;
    println!("Ledger exported to {}", dest.display());
    Ok(())
}
