//! Heuristic field extraction from recognized receipt text.
//!
//! Everything here is best effort: a field that cannot be recovered comes
//! back as an empty string for a human to fill in later.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::fmt::normalize_amount;
use crate::models::ExtractedFields;

lazy_static! {
    // 2024-01-05, 2024/1/5, 01/05/2024, 5-1-2024
    static ref DATE_NUMERIC: Regex = Regex::new(
        r"((?:19|20)\d{2}[-/]\d{1,2}[-/]\d{1,2})|((?:\d{1,2}[-/]){2}(?:19|20)\d{2})"
    ).unwrap();

    // 12Jan24, 3feb2024
    static ref DATE_ABBREV: Regex = Regex::new(r"(\d{1,2})([A-Za-z]{3})(\d{2,4})").unwrap();

    static ref AMOUNT: Regex = Regex::new(r"[$€£]?\d+[\d,]*\.\d{2}").unwrap();

    static ref TOTAL_LABELED: Regex = labeled_amount(&["total", "amount", "balance"]);

    static ref TAX_LABELED: Regex = labeled_amount(&["tax", "vat"]);
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn labeled_amount(labels: &[&str]) -> Regex {
    Regex::new(&format!(r"(?i)(?:{}):?\s*({})", labels.join("|"), AMOUNT.as_str())).unwrap()
}

/// Map recognized text to `{vendor, date, total, tax}`.
pub fn extract(text: &str) -> ExtractedFields {
    ExtractedFields {
        vendor: extract_vendor(text),
        date: extract_date(text),
        total: extract_amount(text, &TOTAL_LABELED),
        tax: extract_amount(text, &TAX_LABELED),
    }
}

fn extract_vendor(text: &str) -> String {
    text.split(['\n', '\r'])
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Numeric dates win over abbreviated-month dates regardless of position.
fn extract_date(text: &str) -> String {
    let token = DATE_NUMERIC
        .find(text)
        .or_else(|| DATE_ABBREV.find(text))
        .map(|m| m.as_str());
    token
        .and_then(parse_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// First labeled amount, else the last amount-shaped token in the text.
fn extract_amount(text: &str, labeled: &Regex) -> String {
    let raw = labeled
        .captures(text)
        .and_then(|caps| caps.get(1))
        .or_else(|| AMOUNT.find_iter(text).last())
        .map(|m| m.as_str());
    match raw {
        Some(token) => normalize_amount(Some(token)),
        None => String::new(),
    }
}

/// Lenient date parsing for a matched token. Returns `None` for anything
/// that is not a real calendar date.
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    if let Some(caps) = DATE_ABBREV.captures(token) {
        if caps.get(0).map(|m| m.as_str().len()) == Some(token.len()) {
            return parse_abbrev(&caps[1], &caps[2], &caps[3]);
        }
    }

    let parts: Vec<&str> = token.split(['-', '/']).collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    let (a, b, c): (u32, u32, u32) = (a.parse().ok()?, b.parse().ok()?, c.parse().ok()?);

    if a >= 1000 {
        NaiveDate::from_ymd_opt(a as i32, b, c)
    } else {
        // year last: month first like US receipts, falling back to day first
        NaiveDate::from_ymd_opt(c as i32, a, b).or_else(|| NaiveDate::from_ymd_opt(c as i32, b, a))
    }
}

fn parse_abbrev(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let month_lower = month.to_lowercase();
    let month = MONTHS.iter().position(|m| *m == month_lower)? as u32 + 1;
    let day: u32 = day.parse().ok()?;
    let year: i32 = match year.len() {
        2 => 2000 + year.parse::<i32>().ok()?,
        4 => year.parse().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}
