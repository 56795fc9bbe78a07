use crate::error::Result;

use super::open_store;

pub fn rebuild(data_dir: Option<&str>) -> Result<()> {
    let (_, layout, mut store) = open_store(data_dir)?;
    if !store.has_mirror() {
        println!("Mirror is disabled in settings; nothing to rebuild.");
        return Ok(());
    }
    let rows = store.rebuild_mirror()?;
    println!("Rebuilt {} from ledger ({rows} receipts)", layout.mirror().display());
    Ok(())
}
