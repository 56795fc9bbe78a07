use std::path::{Path, PathBuf};
use std::process::Command;

use crate::extract::extract;
use crate::models::NewReceipt;

/// Turns an image into recognized text. Implementations never fail: a
/// recognizer that cannot read the image returns an empty string.
pub trait TextRecognizer {
    fn recognize(&self, image: &Path) -> String;
}

/// Runs the `tesseract` binary and captures stdout.
pub struct TesseractCli {
    command: String,
    language: String,
}

impl TesseractCli {
    pub fn new(command: &str, language: &str) -> Self {
        Self {
            command: command.to_string(),
            language: if language.is_empty() { "eng".to_string() } else { language.to_string() },
        }
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image: &Path) -> String {
        let _span = tracing::info_span!("ocr.tesseract", image = %image.display()).entered();
        let output = Command::new(&self.command)
            .arg(image)
            .arg("stdout")
            .args(["-l", self.language.as_str()])
            .output();
        match output {
            Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout).into_owned(),
            Ok(out) => {
                tracing::warn!(
                    status = %out.status,
                    stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                    "tesseract failed; continuing with empty text"
                );
                String::new()
            }
            Err(e) => {
                tracing::warn!(command = %self.command, error = %e, "could not run tesseract; continuing with empty text");
                String::new()
            }
        }
    }
}

/// Reads text recognized elsewhere from a file.
pub struct SidecarText {
    path: Option<PathBuf>,
}

impl SidecarText {
    /// Read from `path`, or from `<image>.txt` when `path` is `None`.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl TextRecognizer for SidecarText {
    fn recognize(&self, image: &Path) -> String {
        let path = self.path.clone().unwrap_or_else(|| {
            let mut name = image.as_os_str().to_owned();
            name.push(".txt");
            PathBuf::from(name)
        });
        std::fs::read_to_string(&path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "could not read recognized text");
            String::new()
        })
    }
}

/// Recognize, extract, and merge in the raw text and image reference.
pub fn ingest(recognizer: &dyn TextRecognizer, image: &Path) -> NewReceipt {
    let text = recognizer.recognize(image);
    let image_path = image.to_string_lossy();
    extract(&text).into_new_receipt(&text, &image_path)
}
