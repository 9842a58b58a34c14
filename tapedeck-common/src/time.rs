//! Clock and date formatting helpers

use chrono::NaiveDate;

/// Render a media position as `m:ss`
///
/// Non-finite or negative input (unknown duration, not yet loaded) renders `0:00`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Render an ISO `YYYY-MM-DD` date as `DD.MM.YYYY`
///
/// Input without a `-` renders as an empty string. Dates that do not parse as a calendar
/// date are reordered field by field.
pub fn format_date(iso: &str) -> String {
    if !iso.contains('-') {
        return String::new();
    }
    if let Ok(date) = NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        return date.format("%d.%m.%Y").to_string();
    }
    let mut parts = iso.splitn(3, '-');
    let year = parts.next().unwrap_or_default();
    let month = parts.next().unwrap_or_default();
    let day = parts.next().unwrap_or_default();
    format!("{}.{}.{}", day, month, year)
}
