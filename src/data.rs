//! Value-level cleaning helpers shared by the ingestion pipeline and the
//! price lookup: header normalization, date parsing/coercion, and price-text
//! cleanup.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

/// Trims a header and collapses interior runs of whitespace to one space.
pub fn normalize_header(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    // ISO first so normalization stays idempotent; month-first slashed dates
    // outrank day-first.
    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%m/%d/%Y",
        "%d/%m/%Y",
        "%Y/%m/%d",
        "%m-%d-%Y",
        "%d-%m-%Y",
    ];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

/// Coerces a raw cell to an ISO `YYYY-MM-DD` string. Empty or unparseable
/// values become `None` rather than an error.
pub fn clean_date(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_naive_date(trimmed)
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Strips currency symbols and thousand separators from scraped price text
/// and parses the remainder as a number.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace('$', "").replace(',', "");
    cleaned.trim().parse::<f64>().ok()
}
