//! Conversion helpers shared by the stores and the CLI.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref HOURS_RE: Regex = Regex::new(r"(\d+)h").unwrap();
    static ref MINUTES_RE: Regex = Regex::new(r"(\d+)m").unwrap();
}

/// Parse a duration string (e.g. "1h 23m") to minutes.
///
/// Missing parts count as zero, so "45m" and "2h" both parse.
pub fn parse_duration(s: &str) -> u32 {
    let hours = HOURS_RE
        .captures(s)
        .and_then(|c| c[1].parse::<u32>().ok())
        .unwrap_or(0);
    let minutes = MINUTES_RE
        .captures(s)
        .and_then(|c| c[1].parse::<u32>().ok())
        .unwrap_or(0);

    hours * 60 + minutes
}

/// Format minutes as a duration string (e.g. "1h 23m").
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let remaining = minutes % 60;

    if remaining == 0 {
        return format!("{}h", hours);
    }
    if hours > 0 {
        format!("{}h {}m", hours, remaining)
    } else {
        format!("{}m", remaining)
    }
}

/// ISO date string (`YYYY-MM-DD`) used in query parameters
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Short display date, e.g. "Nov 14, 2024"
pub fn format_fancy_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y").to_string()
}

/// 12-hour clock display, e.g. "3:05 PM"
pub fn format_time(ts: &DateTime<Utc>) -> String {
    ts.format("%-I:%M %p").to_string()
}

/// Create a directory (and parents) if it does not exist yet.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}
