use crate::error::Result;
use crate::settings::{load_settings, resolve_layout, save_settings};
use crate::store::ReceiptStore;

pub fn run(data_dir: Option<&str>) -> Result<()> {
    let mut settings = load_settings();
    let layout = resolve_layout(&settings, data_dir);
    settings.data_dir = layout.root.to_string_lossy().to_string();
    save_settings(&settings)?;

    std::fs::create_dir_all(&layout.root)?;
    std::fs::create_dir_all(layout.images())?;
    std::fs::create_dir_all(layout.exports())?;

    let mirror = settings.mirror.then(|| layout.mirror());
    ReceiptStore::open(&layout.ledger(), mirror.as_deref())?;

    println!("Initialized receipts at {}", layout.root.display());
    Ok(())
}
