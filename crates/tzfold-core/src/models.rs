//! Core data types for tzfold.
//!
//! This module defines the primary types used throughout the library:
//! - [`Fold`] - Which occurrence of a repeated wall-clock reading is meant
//! - [`DstStatus`] - Whether daylight saving time is in effect at a sample
//! - [`DstHint`] - Caller preference when resolving wall-clock fields
//! - [`OffsetSample`] - One resolved view of a zone at an instant
//! - [`LocalSample`] - Wall-clock fields plus the sample they resolved under
//! - [`WallClock`] - Wall-clock fields plus a fold bit

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Disambiguation bit for wall-clock readings repeated by a backward
/// clock transition.
///
/// `First` names the earlier of the two instants sharing the reading,
/// `Second` the later one. Outside an overlap window the fold does not
/// affect which instant a reading resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fold {
    /// The earlier occurrence (larger UTC offset).
    #[default]
    First,
    /// The later occurrence, after the clocks moved back.
    Second,
}

impl Fold {
    /// Numeric form, 0 or 1.
    pub fn index(self) -> u8 {
        match self {
            Fold::First => 0,
            Fold::Second => 1,
        }
    }

    /// Builds a fold from its numeric form; any nonzero value means `Second`.
    pub fn from_index(index: u8) -> Self {
        if index == 0 { Fold::First } else { Fold::Second }
    }
}

impl std::fmt::Display for Fold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fold::First => write!(f, "first"),
            Fold::Second => write!(f, "second"),
        }
    }
}

/// Daylight saving status of a resolved sample.
///
/// `Unknown` is reserved for oracles that genuinely cannot report DST
/// status. It is never used to mean "no DST rules": a zone without DST
/// reports `Standard` with a zero delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DstStatus {
    /// A daylight rule is in effect (the delta may be negative).
    Daylight,
    /// Standard time is in effect.
    Standard,
    /// The backing platform cannot tell.
    Unknown,
}

impl DstStatus {
    /// Whether the status carries information.
    pub fn is_known(self) -> bool {
        !matches!(self, DstStatus::Unknown)
    }

    /// The hint that requests the opposite interpretation, used to probe
    /// for the second candidate of an ambiguous reading. `None` when the
    /// status itself is unknown.
    pub fn flipped(self) -> Option<DstHint> {
        match self {
            DstStatus::Daylight => Some(DstHint::Standard),
            DstStatus::Standard => Some(DstHint::Daylight),
            DstStatus::Unknown => None,
        }
    }
}

impl std::fmt::Display for DstStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DstStatus::Daylight => write!(f, "daylight"),
            DstStatus::Standard => write!(f, "standard"),
            DstStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Caller preference when resolving wall-clock fields to an instant,
/// mirroring the three states of `tm_isdst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstHint {
    /// No preference; let the zone rules decide (`tm_isdst < 0`).
    Detect,
    /// Prefer the standard-time interpretation (`tm_isdst == 0`).
    Standard,
    /// Prefer the daylight interpretation (`tm_isdst > 0`).
    Daylight,
}

/// The result of resolving one instant against a zone: offset, DST
/// portion, abbreviation, status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffsetSample {
    /// Total offset from UTC, in seconds east.
    pub utc_offset_secs: i32,
    /// Portion of the offset attributable to DST. `None` only when the
    /// platform cannot report DST status; a zone without DST reports
    /// `Some(0)`.
    pub dst_offset_secs: Option<i32>,
    /// Zone abbreviation as reported by the zone data, e.g. `"NST"` or
    /// the numeric style `"+1030"`.
    pub abbreviation: String,
    /// Daylight saving status at the sampled instant.
    pub status: DstStatus,
}

impl OffsetSample {
    /// Total offset from UTC as a duration.
    pub fn utc_offset(&self) -> Duration {
        Duration::seconds(i64::from(self.utc_offset_secs))
    }

    /// DST portion of the offset as a duration, when known.
    pub fn dst_offset(&self) -> Option<Duration> {
        self.dst_offset_secs.map(|s| Duration::seconds(i64::from(s)))
    }
}

/// Wall-clock fields for an instant together with the sample they
/// resolved under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalSample {
    /// Local wall-clock reading of the sampled instant.
    pub wall: NaiveDateTime,
    /// Offset information in effect at that instant.
    pub offset: OffsetSample,
}

/// A local wall-clock reading plus the fold bit disambiguating repeated
/// readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallClock {
    /// Year through microsecond, with no offset attached.
    pub datetime: NaiveDateTime,
    /// Which occurrence is meant when the reading falls in an overlap
    /// window.
    pub fold: Fold,
}

impl WallClock {
    /// Pairs a wall-clock reading with a fold bit.
    pub fn new(datetime: NaiveDateTime, fold: Fold) -> Self {
        Self { datetime, fold }
    }
}

/// Formats an offset the way tzdata renders numeric zone designations:
/// sign and two-digit hours, with minutes appended only when nonzero
/// (`"+00"`, `"-01"`, `"+1030"`).
pub(crate) fn offset_abbreviation(offset_secs: i32) -> String {
    let sign = if offset_secs < 0 { '-' } else { '+' };
    let total_minutes = offset_secs.abs() / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if minutes == 0 {
        format!("{sign}{hours:02}")
    } else {
        format!("{sign}{hours:02}{minutes:02}")
    }
}
