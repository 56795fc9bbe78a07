use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ReceiptError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    /// Maintain the SQLite mirror next to the ledger.
    #[serde(default = "default_true")]
    pub mirror: bool,
    #[serde(default = "default_tesseract")]
    pub tesseract: String,
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
}

fn default_true() -> bool {
    true
}

fn default_tesseract() -> String {
    "tesseract".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            mirror: true,
            tesseract: default_tesseract(),
            ocr_language: default_ocr_language(),
        }
    }
}

/// File layout under the data directory.
#[derive(Debug, Clone)]
pub struct DataLayout {
    pub root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ledger(&self) -> PathBuf {
        self.root.join("receipts.csv")
    }

    pub fn mirror(&self) -> PathBuf {
        self.root.join("receipts.db")
    }

    pub fn images(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn exports(&self) -> PathBuf {
        self.root.join("exports")
    }
}

/// `$XDG_CONFIG_HOME/receipts/settings.json`, usually under `~/.config`.
fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("receipts")
        .join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("receipts")
}

pub fn load_settings() -> Settings {
    read_settings(&settings_path())
}

/// Defaults for a missing file; defaults plus a warning for a broken one.
fn read_settings(path: &Path) -> Settings {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Settings::default();
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
        Settings::default()
    })
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    write_settings(&settings_path(), settings)
}

fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ReceiptError::Settings(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, format!("{json}\n"))?;
    std::fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), "settings saved");
    Ok(())
}

/// Data directory from `--data-dir` if given, else from settings.
pub fn resolve_layout(settings: &Settings, data_dir: Option<&str>) -> DataLayout {
    match data_dir {
        Some(dir) => DataLayout::new(expand_data_dir(dir)),
        None => DataLayout::new(&settings.data_dir),
    }
}

/// Expand a leading `~` and make the path absolute when it already exists.
fn expand_data_dir(dir: &str) -> PathBuf {
    let home = dirs::home_dir();
    let expanded = match (dir.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(dir),
    };
    std::fs::canonicalize(&expanded).unwrap_or(expanded)
}
