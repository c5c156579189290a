//! Time and timestamp utilities

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;

/// Get current Unix timestamp in seconds
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Format a date as `dd/mm/yyyy` for printable documents
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
