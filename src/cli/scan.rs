use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ocr::{ingest, SidecarText, TesseractCli, TextRecognizer};

use super::{open_store, tolerate_stale_mirror};

pub fn run(data_dir: Option<&str>, image: &str, text_file: Option<&str>) -> Result<()> {
    let (settings, layout, mut store) = open_store(data_dir)?;

    let source = Path::new(image);
    let stored = store_image(source, &layout.images())?;

    let recognizer: Box<dyn TextRecognizer> = match text_file {
        Some(path) => Box::new(SidecarText::new(Some(PathBuf::from(path)))),
        None => Box::new(TesseractCli::new(&settings.tesseract, &settings.ocr_language)),
    };
    let fields = ingest(recognizer.as_ref(), &stored);

    if let Some(receipt) = tolerate_stale_mirror(store.add_receipt(fields))? {
        println!("Added receipt {}", receipt.id);
        println!("  vendor: {}", receipt.vendor);
        println!("  date:   {}", receipt.date);
        println!("  total:  {}", receipt.total);
        println!("  tax:    {}", receipt.tax);
    }
    Ok(())
}

/// Copy the image into the images directory unless it already lives there.
/// A name clash gets a timestamp prefix.
fn store_image(source: &Path, images_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(images_dir)?;
    if source.parent().map(|p| p == images_dir).unwrap_or(false) {
        return Ok(source.to_path_buf());
    }
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "uploaded.jpg".to_string());
    let mut dest = images_dir.join(&name);
    if dest.exists() {
        let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        dest = images_dir.join(format!("{stamp}_{name}"));
    }
    std::fs::copy(source, &dest)?;
    Ok(dest)
}
