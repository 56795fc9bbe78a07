const CURRENCY_SYMBOLS: [char; 3] = ['$', '€', '£'];

/// Normalize an amount to a fixed two-decimal string.
///
/// Currency symbols and thousands separators are stripped first. Empty input
/// becomes an empty string; input that still does not parse is returned as
/// given so an operator-entered value is never lost.
pub fn normalize_amount(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return String::new();
    };
    let stripped: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return String::new();
    }
    match stripped.parse::<f64>() {
        Ok(n) if n.is_finite() => format!("{n:.2}"),
        _ => raw.to_string(),
    }
}

/// Parse a stored amount for arithmetic. Empty or non-numeric values are `None`.
pub fn amount_value(stored: &str) -> Option<f64> {
    let v: f64 = stored.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}
