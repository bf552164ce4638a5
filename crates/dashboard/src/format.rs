//! Cell formatting shared by the pages.

use chrono::{DateTime, Utc};
use grid::column::EMPTY_CELL;

const TRAFFIC_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Epoch milliseconds as a UTC timestamp; zero means unset.
pub fn date(millis: i64) -> String {
    if millis <= 0 {
        return EMPTY_CELL.to_string();
    }
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// Minor currency units (cents) as a two-decimal major amount.
pub fn major_unit(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

pub fn traffic(bytes: i64, unlimited: bool) -> String {
    if bytes <= 0 {
        return if unlimited {
            "Unlimited".to_string()
        } else {
            "0 B".to_string()
        };
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < TRAFFIC_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", TRAFFIC_UNITS[unit])
    }
}

pub fn validity_period(start: i64, expire: i64) -> String {
    match (start > 0, expire > 0) {
        (false, _) => EMPTY_CELL.to_string(),
        (true, false) => date(start),
        (true, true) => format!("{} - {}", date(start), date(expire)),
    }
}

pub fn switch(on: bool) -> String {
    if on { "on" } else { "off" }.to_string()
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
