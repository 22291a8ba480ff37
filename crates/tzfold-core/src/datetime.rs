//! The aware datetime wrapper.
//!
//! A [`ZonedDateTime`] pairs wall-clock fields and a fold bit with the
//! [`Zone`] that produced them; there is no way to construct one without
//! a zone, which is the library's construction-time awareness guarantee.
//! Offset, abbreviation and DST queries go back through the zone on every
//! call, so a runtime change of the system zone is reflected immediately.

use std::fmt;
use std::ops::{Add, Sub};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};

use crate::error::{Result, TzFoldError};
use crate::models::{Fold, WallClock};
use crate::parse::parse_local_naive;
use crate::zone::Zone;

/// A datetime guaranteed to carry timezone information.
#[derive(Debug, Clone)]
pub struct ZonedDateTime {
    wall: WallClock,
    zone: Zone,
}

impl ZonedDateTime {
    /// Interprets a wall-clock reading in `zone`, taking the earlier
    /// occurrence if the reading is repeated.
    pub fn new(datetime: NaiveDateTime, zone: Zone) -> Self {
        Self::with_fold(datetime, zone, Fold::First)
    }

    /// Interprets a wall-clock reading in `zone` with an explicit fold.
    pub fn with_fold(datetime: NaiveDateTime, zone: Zone, fold: Fold) -> Self {
        Self {
            wall: WallClock::new(datetime, fold),
            zone,
        }
    }

    pub(crate) fn from_wall(wall: WallClock, zone: Zone) -> Self {
        Self { wall, zone }
    }

    /// The current moment in `zone`.
    pub fn now_in(zone: Zone) -> Self {
        zone.now()
    }

    /// The current moment in `zone`, shifted forward by `delta` on the
    /// wall clock.
    pub fn future(zone: Zone, delta: Duration) -> Self {
        zone.now() + delta
    }

    /// The current moment in `zone`, shifted back by `delta` on the wall
    /// clock.
    pub fn past(zone: Zone, delta: Duration) -> Self {
        zone.now() - delta
    }

    /// Converts a Unix timestamp to a datetime in `zone`.
    pub fn from_timestamp(secs: i64, micros: u32, zone: Zone) -> Result<Self> {
        if micros >= 1_000_000 {
            return Err(TzFoldError::OutOfRange(format!(
                "microsecond component {micros}"
            )));
        }
        let instant = DateTime::from_timestamp(secs, micros * 1_000)
            .ok_or_else(|| TzFoldError::OutOfRange(format!("timestamp {secs}s")))?;
        Ok(zone.from_utc(instant))
    }

    /// Converts an absolute instant to a datetime in `zone`.
    pub fn from_instant(instant: DateTime<Utc>, zone: Zone) -> Self {
        zone.from_utc(instant)
    }

    /// Parses an RFC3339 timestamp. The offset in the text becomes the
    /// zone tag (`Z` and `+00:00` become UTC). Text without an offset is
    /// rejected as naive rather than guessed at.
    pub fn parse_rfc3339(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match DateTime::parse_from_rfc3339(trimmed) {
            Ok(dt) => {
                let zone = if dt.offset().local_minus_utc() == 0 {
                    Zone::Utc
                } else {
                    Zone::Fixed(*dt.offset())
                };
                Ok(zone.from_utc(dt.with_timezone(&Utc)))
            }
            Err(err) => {
                if parse_local_naive(trimmed).is_ok() {
                    return Err(TzFoldError::NaiveDatetime(format!(
                        "'{trimmed}' carries no UTC offset; use parse_local with an explicit zone"
                    )));
                }
                Err(TzFoldError::ParseError(format!(
                    "Invalid RFC3339 timestamp: '{trimmed}'. Error: {err}"
                )))
            }
        }
    }

    /// Parses a local wall-clock reading (no offset in the text) and tags
    /// it with an explicit zone and fold.
    pub fn parse_local(s: &str, zone: Zone, fold: Fold) -> Result<Self> {
        let naive = parse_local_naive(s)?;
        Ok(Self::with_fold(naive, zone, fold))
    }

    /// The zone this value is tagged with.
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Wall-clock fields plus fold.
    pub fn wall(&self) -> WallClock {
        self.wall
    }

    /// Wall-clock fields without zone or fold.
    pub fn naive_local(&self) -> NaiveDateTime {
        self.wall.datetime
    }

    /// Which occurrence of a repeated reading this value denotes.
    pub fn fold(&self) -> Fold {
        self.wall.fold
    }

    /// The absolute instant this value denotes, resolved against the
    /// zone's current rules.
    pub fn instant(&self) -> DateTime<Utc> {
        self.zone.instant_of(&self.wall)
    }

    /// Unix timestamp in seconds.
    pub fn timestamp(&self) -> i64 {
        self.instant().timestamp()
    }

    /// UTC offset in effect for this value.
    pub fn utc_offset(&self) -> Duration {
        self.zone.utc_offset(Some(self))
    }

    /// Zone abbreviation in effect for this value.
    pub fn tzname(&self) -> String {
        self.zone.name(Some(self))
    }

    /// Daylight saving delta for this value; zero when DST is not in
    /// effect, `None` when the zone's oracle cannot tell.
    pub fn dst(&self) -> Option<Duration> {
        self.zone.dst_delta(Some(self))
    }

    /// The same instant expressed in another zone.
    pub fn in_zone(&self, zone: &Zone) -> ZonedDateTime {
        zone.from_utc(self.instant())
    }

    /// Elapsed time from `other` to `self`.
    pub fn signed_duration_since(&self, other: &ZonedDateTime) -> Duration {
        self.instant() - other.instant()
    }

    /// RFC3339 rendering of the wall-clock fields with the resolved
    /// offset, e.g. `2023-11-05T01:00:00-03:30`.
    pub fn to_rfc3339(&self) -> String {
        let total = self.utc_offset().num_seconds();
        let sign = if total < 0 { '-' } else { '+' };
        let abs = total.abs();
        format!(
            "{}{}{:02}:{:02}",
            self.wall.datetime.format("%Y-%m-%dT%H:%M:%S"),
            sign,
            abs / 3600,
            (abs % 3600) / 60
        )
    }
}

/// Wall-clock arithmetic: the fields move, the zone stays, and the fold
/// resets to the earlier occurrence. The absolute distance covered can
/// differ from `rhs` across a transition.
impl Add<Duration> for ZonedDateTime {
    type Output = ZonedDateTime;

    fn add(self, rhs: Duration) -> ZonedDateTime {
        ZonedDateTime::with_fold(self.wall.datetime + rhs, self.zone, Fold::First)
    }
}

impl Sub<Duration> for ZonedDateTime {
    type Output = ZonedDateTime;

    fn sub(self, rhs: Duration) -> ZonedDateTime {
        ZonedDateTime::with_fold(self.wall.datetime - rhs, self.zone, Fold::First)
    }
}

/// Equality and ordering compare the denoted instants, so values in
/// different zones compare equal when they name the same moment.
impl PartialEq for ZonedDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.instant() == other.instant()
    }
}

impl PartialOrd for ZonedDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.instant().cmp(&other.instant()))
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for ZonedDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}
