//! Input parsing for timestamps and local wall-clock readings.
//!
//! Instants arrive in one of three formats:
//! - `epoch_ms`: Unix epoch milliseconds (default)
//! - `epoch_s`: Unix epoch seconds
//! - `rfc3339`: RFC3339 formatted strings (e.g., `2023-11-05T04:30:00Z`)
//!
//! Local readings (no offset attached) use `parse_local_naive`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::str::FromStr;

use crate::error::{Result, TzFoldError};

/// Supported instant formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// Unix epoch milliseconds (e.g., "1699158600000")
    #[default]
    EpochMs,
    /// Unix epoch seconds (e.g., "1699158600")
    EpochS,
    /// RFC3339 format (e.g., "2023-11-05T04:30:00Z" or "2023-11-05T01:00:00-03:30")
    Rfc3339,
}

impl std::fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampFormat::EpochMs => write!(f, "epoch_ms"),
            TimestampFormat::EpochS => write!(f, "epoch_s"),
            TimestampFormat::Rfc3339 => write!(f, "rfc3339"),
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = TzFoldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "epoch_ms" => Ok(TimestampFormat::EpochMs),
            "epoch_s" => Ok(TimestampFormat::EpochS),
            "rfc3339" => Ok(TimestampFormat::Rfc3339),
            _ => Err(TzFoldError::ParseError(format!(
                "Unknown format: '{}'. Expected 'epoch_ms', 'epoch_s', or 'rfc3339'",
                s
            ))),
        }
    }
}

/// Parse an instant string according to the specified format.
///
/// # Examples
///
/// ```
/// use tzfold_core::parse::{parse_timestamp, TimestampFormat};
/// use chrono::{TimeZone, Utc};
///
/// let dt = parse_timestamp("1699158600000", TimestampFormat::EpochMs).unwrap();
/// assert_eq!(dt, Utc.timestamp_millis_opt(1699158600000).single().unwrap());
///
/// let dt = parse_timestamp("2023-11-05T04:30:00Z", TimestampFormat::Rfc3339).unwrap();
/// assert_eq!(dt.timestamp(), 1699158600);
/// ```
pub fn parse_timestamp(input: &str, format: TimestampFormat) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    match format {
        TimestampFormat::EpochMs => parse_epoch_ms(trimmed),
        TimestampFormat::EpochS => parse_epoch_s(trimmed),
        TimestampFormat::Rfc3339 => parse_rfc3339(trimmed),
    }
}

/// Parse epoch milliseconds.
fn parse_epoch_ms(input: &str) -> Result<DateTime<Utc>> {
    let ms: i64 = input.parse().map_err(|_| {
        TzFoldError::ParseError(format!(
            "Invalid epoch milliseconds: '{}'. Expected integer value.",
            input
        ))
    })?;

    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| TzFoldError::OutOfRange(format!("epoch milliseconds {}", ms)))
}

/// Parse epoch seconds.
fn parse_epoch_s(input: &str) -> Result<DateTime<Utc>> {
    let s: i64 = input.parse().map_err(|_| {
        TzFoldError::ParseError(format!(
            "Invalid epoch seconds: '{}'. Expected integer value.",
            input
        ))
    })?;

    Utc.timestamp_opt(s, 0)
        .single()
        .ok_or_else(|| TzFoldError::OutOfRange(format!("epoch seconds {}", s)))
}

/// Parse an RFC3339 formatted instant; the offset is consumed and the
/// result normalized to UTC.
fn parse_rfc3339(input: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            TzFoldError::ParseError(format!(
                "Invalid RFC3339 timestamp: '{}'. Error: {}",
                input, e
            ))
        })
}

/// Parse an instant string, auto-detecting the format.
///
/// Attempts RFC3339 when the input looks like a datetime, then epoch
/// milliseconds for large numbers, then epoch seconds.
pub fn parse_timestamp_auto(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if trimmed.contains('T')
        || trimmed.contains('Z')
        || (trimmed.len() > 6 && trimmed.contains(':'))
    {
        return parse_rfc3339(trimmed);
    }

    if let Ok(num) = trimmed.parse::<i64>() {
        // Heuristic: above 10^11 the number is almost certainly
        // milliseconds (year 5138 in seconds, year 1973 in ms).
        if num.abs() > 100_000_000_000 {
            return parse_epoch_ms(trimmed);
        }
        return parse_epoch_s(trimmed);
    }

    Err(TzFoldError::ParseError(format!(
        "Could not auto-detect format for: '{}'",
        input
    )))
}

/// Parse a local wall-clock reading that carries no offset.
///
/// Accepted shapes: `YYYY-MM-DDTHH:MM:SS[.ffffff]`, the same with a
/// space separator, and both without seconds.
pub fn parse_local_naive(s: &str) -> Result<NaiveDateTime> {
    let trimmed = s.trim();
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }

    Err(TzFoldError::ParseError(format!(
        "Invalid local time '{}'. Expected: YYYY-MM-DDTHH:MM:SS",
        trimmed
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};

    #[test]
    fn parse_epoch_milliseconds() {
        let dt = parse_timestamp("1699158600000", TimestampFormat::EpochMs).unwrap();
        let expected = Utc.timestamp_millis_opt(1699158600000).single().unwrap();
        assert_eq!(dt, expected);
    }

    #[test]
    fn parse_epoch_seconds() {
        let dt = parse_timestamp("1699158600", TimestampFormat::EpochS).unwrap();
        let expected = Utc.timestamp_opt(1699158600, 0).single().unwrap();
        assert_eq!(dt, expected);
    }

    #[test]
    fn parse_rfc3339_zulu() {
        let dt = parse_timestamp("2023-11-05T04:30:00Z", TimestampFormat::Rfc3339).unwrap();
        assert_eq!(dt.timestamp(), 1699158600);
    }

    #[test]
    fn parse_rfc3339_with_offset() {
        // 2023-11-05T01:00:00-03:30 = 2023-11-05T04:30:00Z
        let dt = parse_timestamp("2023-11-05T01:00:00-03:30", TimestampFormat::Rfc3339).unwrap();
        assert_eq!(dt.timestamp(), 1699158600);
        assert_eq!(dt.hour(), 4);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn parse_invalid_inputs() {
        assert!(parse_timestamp("not-a-number", TimestampFormat::EpochMs).is_err());
        assert!(parse_timestamp("not-a-date", TimestampFormat::Rfc3339).is_err());
    }

    #[test]
    fn format_from_str() {
        assert_eq!(
            TimestampFormat::from_str("epoch_ms").unwrap(),
            TimestampFormat::EpochMs
        );
        assert_eq!(
            TimestampFormat::from_str("epoch_s").unwrap(),
            TimestampFormat::EpochS
        );
        assert_eq!(
            TimestampFormat::from_str("rfc3339").unwrap(),
            TimestampFormat::Rfc3339
        );
        assert!(TimestampFormat::from_str("invalid").is_err());
    }

    #[test]
    fn auto_detect_formats() {
        assert_eq!(
            parse_timestamp_auto("2023-11-05T04:30:00Z").unwrap().timestamp(),
            1699158600
        );
        assert_eq!(
            parse_timestamp_auto("1699158600000").unwrap().timestamp(),
            1699158600
        );
        assert_eq!(
            parse_timestamp_auto("1699158600").unwrap().timestamp(),
            1699158600
        );
        assert!(parse_timestamp_auto("tomorrow").is_err());
    }

    #[test]
    fn format_display() {
        assert_eq!(format!("{}", TimestampFormat::EpochMs), "epoch_ms");
        assert_eq!(format!("{}", TimestampFormat::EpochS), "epoch_s");
        assert_eq!(format!("{}", TimestampFormat::Rfc3339), "rfc3339");
    }

    #[test]
    fn local_naive_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 11, 5)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        assert_eq!(parse_local_naive("2023-11-05T01:30:00").unwrap(), expected);
        assert_eq!(parse_local_naive("2023-11-05 01:30:00").unwrap(), expected);
        assert_eq!(parse_local_naive("2023-11-05T01:30").unwrap(), expected);
        let fractional = parse_local_naive("2023-11-05T01:30:00.250000").unwrap();
        assert_eq!(fractional.year(), 2023);
        assert_eq!(fractional.and_utc().timestamp_subsec_micros(), 250_000);
        assert!(parse_local_naive("2023-11-05T01:00:00Z").is_err());
    }
}
