use chrono::{DateTime, Duration, Utc};
use tzfold_core::{Fold, TimestampFormat, Zone, parse_timestamp, parse_timestamp_auto};

use crate::error::{CliError, CliResult};

pub fn parse_zone(s: &str) -> CliResult<Zone> {
    s.parse::<Zone>()
        .map_err(|e| CliError::input(e.to_string()))
}

pub fn parse_fold(s: &str) -> CliResult<Fold> {
    match s.to_lowercase().as_str() {
        "first" | "0" => Ok(Fold::First),
        "second" | "1" => Ok(Fold::Second),
        _ => Err(CliError::input(format!(
            "Invalid fold '{}'. Expected: first, second",
            s
        ))),
    }
}

/// `None` means auto-detection.
pub fn parse_format(s: &str) -> CliResult<Option<TimestampFormat>> {
    if s.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    s.parse::<TimestampFormat>()
        .map(Some)
        .map_err(|e| CliError::input(e.to_string()))
}

pub fn parse_instant(s: &str, format: Option<TimestampFormat>) -> CliResult<DateTime<Utc>> {
    match format {
        Some(format) => parse_timestamp(s, format),
        None => parse_timestamp_auto(s),
    }
    .map_err(|e| CliError::input(e.to_string()))
}

/// Renders a signed duration as `+HH:MM:SS`.
pub fn format_signed(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { '-' } else { '+' };
    let abs = total.abs();
    format!(
        "{sign}{:02}:{:02}:{:02}",
        abs / 3600,
        (abs % 3600) / 60,
        abs % 60
    )
}

/// Renders an instant as RFC3339 UTC with a `Z` suffix.
pub fn format_instant_utc(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
