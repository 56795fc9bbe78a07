use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ledger column order. Serde writes the header from the field order below.
pub const LEDGER_HEADERS: [&str; 8] = [
    "id",
    "created_at",
    "date",
    "vendor",
    "total",
    "tax",
    "image_path",
    "raw_text",
];

/// One row of the ledger. Amounts stay strings so that an operator-entered
/// value which does not parse survives untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub total: String,
    #[serde(default)]
    pub tax: String,
    #[serde(default)]
    pub image_path: String,
    #[serde(default)]
    pub raw_text: String,
}

impl Receipt {
    pub fn field(&self, column: Column) -> &str {
        match column {
            Column::Id => &self.id,
            Column::CreatedAt => &self.created_at,
            Column::Date => &self.date,
            Column::Vendor => &self.vendor,
            Column::Total => &self.total,
            Column::Tax => &self.tax,
            Column::ImagePath => &self.image_path,
            Column::RawText => &self.raw_text,
        }
    }

    /// Case-insensitive substring match over vendor, raw text and date.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.vendor, &self.raw_text, &self.date]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Input to `ReceiptStore::add_receipt`. `None` means the caller did not
/// supply the field; it is stored as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewReceipt {
    pub id: Option<String>,
    pub date: Option<String>,
    pub vendor: Option<String>,
    pub total: Option<String>,
    pub tax: Option<String>,
    pub image_path: Option<String>,
    pub raw_text: Option<String>,
}

/// Partial update. Only `Some` fields replace the stored value, so an
/// explicit `Some(String::new())` clears a field while `None` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptUpdate {
    pub date: Option<String>,
    pub vendor: Option<String>,
    pub total: Option<String>,
    pub tax: Option<String>,
    pub raw_text: Option<String>,
    pub image_path: Option<String>,
}

impl ReceiptUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Output of the field extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedFields {
    pub vendor: String,
    pub date: String,
    pub total: String,
    pub tax: String,
}

impl ExtractedFields {
    /// Merge with the recognized text and image reference for storage.
    pub fn into_new_receipt(self, raw_text: &str, image_path: &str) -> NewReceipt {
        NewReceipt {
            id: None,
            date: Some(self.date),
            vendor: Some(self.vendor),
            total: Some(self.total),
            tax: Some(self.tax),
            image_path: Some(image_path.to_string()),
            raw_text: Some(raw_text.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Column {
    Id,
    #[default]
    CreatedAt,
    Date,
    Vendor,
    Total,
    Tax,
    ImagePath,
    RawText,
}

impl Column {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::CreatedAt => "created_at",
            Self::Date => "date",
            Self::Vendor => "vendor",
            Self::Total => "total",
            Self::Tax => "tax",
            Self::ImagePath => "image_path",
            Self::RawText => "raw_text",
        }
    }
}

const ALL_COLUMNS: &[Column] = &[
    Column::Id,
    Column::CreatedAt,
    Column::Date,
    Column::Vendor,
    Column::Total,
    Column::Tax,
    Column::ImagePath,
    Column::RawText,
];

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_COLUMNS
            .iter()
            .find(|c| c.key() == s)
            .copied()
            .ok_or_else(|| format!("unknown column '{s}' (expected one of: {})", LEDGER_HEADERS.join(", ")))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Dashboard figures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub total_sum: f64,
    pub tax_sum: f64,
}
