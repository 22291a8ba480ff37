//! Zone capability: the system-timezone resolver and the zone handle a
//! [`ZonedDateTime`] is tagged with.
//!
//! A [`SystemZone`] models "whatever zone this machine is configured
//! with". It holds no per-call state: every operation re-queries its
//! oracle, so a runtime zone change is reflected immediately. [`Zone`]
//! unifies the system resolver with UTC, fixed offsets and named tzdata
//! zones behind the same four operations.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::datetime::ZonedDateTime;
use crate::error::TzFoldError;
use crate::models::{DstStatus, LocalSample, OffsetSample, WallClock, offset_abbreviation};
use crate::oracle::{OffsetOracle, SnapshotOracle, SystemOracle};
use crate::resolve::{
    ResolvedInstant, UtcCandidates, dst_delta_at, local_for_instant, resolve_wall_clock,
    utc_candidates_for_wallclock,
};

/// Resolver for the system's current local timezone.
///
/// Cloning shares the underlying configuration; a clone is the *same*
/// resolver for the purposes of the tagging contract, while a freshly
/// constructed resolver is not, even when configured identically.
/// Equality ([`PartialEq`]) is by configuration: two resolvers compare
/// equal when their oracles share a source, regardless of display name.
#[derive(Debug, Clone)]
pub struct SystemZone {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    oracle: Box<dyn OffsetOracle>,
    name: Option<String>,
}

impl SystemZone {
    /// Resolver backed by the live operating-system zone.
    pub fn new() -> Self {
        Self::with_parts(Box::new(SystemOracle::new()), None)
    }

    /// Live-zone resolver with a display name override. The name affects
    /// only how the resolver prints; it takes no part in equality or
    /// resolution.
    pub fn named(name: impl Into<String>) -> Self {
        Self::with_parts(Box::new(SystemOracle::new()), Some(name.into()))
    }

    /// Resolver backed by an injected oracle, e.g. a
    /// [`SnapshotOracle`](crate::oracle::SnapshotOracle) pinned to a fixed
    /// zone for tests.
    pub fn with_oracle(oracle: impl OffsetOracle + 'static) -> Self {
        Self::with_parts(Box::new(oracle), None)
    }

    fn with_parts(oracle: Box<dyn OffsetOracle>, name: Option<String>) -> Self {
        Self {
            inner: Arc::new(Inner { oracle, name }),
        }
    }

    /// IANA key of the zone currently backing this resolver, when known.
    pub fn key(&self) -> Option<String> {
        self.inner.oracle.zone_key()
    }

    /// The display name override, if one was configured.
    pub fn display_name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Whether `other` is this exact resolver (shares the same inner
    /// configuration allocation), as opposed to merely comparing equal.
    pub fn is_same_instance(&self, other: &SystemZone) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn oracle(&self) -> &dyn OffsetOracle {
        self.inner.oracle.as_ref()
    }

    /// UTC offset at `dt`, or at the current moment when `dt` is `None`.
    ///
    /// # Panics
    ///
    /// Panics when `dt` is tagged with anything but this exact resolver.
    pub fn utc_offset(&self, dt: Option<&ZonedDateTime>) -> Duration {
        offset_with(self.oracle(), dt.map(|dt| self.claim(dt)))
    }

    /// Zone abbreviation at `dt`, or at the current moment when `dt` is
    /// `None`. Whatever the zone data reports is propagated, including
    /// numeric designations like `"+0530"`.
    ///
    /// # Panics
    ///
    /// Panics when `dt` is tagged with anything but this exact resolver.
    pub fn name(&self, dt: Option<&ZonedDateTime>) -> String {
        name_with(self.oracle(), dt.map(|dt| self.claim(dt)))
    }

    /// Daylight saving delta at `dt`, or at the current moment when `dt`
    /// is `None`. Zero means DST is not in effect; `None` means the
    /// oracle cannot tell.
    ///
    /// # Panics
    ///
    /// Panics when `dt` is tagged with anything but this exact resolver.
    pub fn dst_delta(&self, dt: Option<&ZonedDateTime>) -> Option<Duration> {
        dst_with(self.oracle(), dt.map(|dt| self.claim(dt)))
    }

    /// Converts an instant to a local datetime tagged with this resolver,
    /// with the fold bit set for readings inside an overlap window.
    pub fn from_utc(&self, instant: DateTime<Utc>) -> ZonedDateTime {
        let (wall, _) = local_for_instant(self.oracle(), instant);
        ZonedDateTime::from_wall(wall, Zone::Local(self.clone()))
    }

    /// The current moment as a local datetime tagged with this resolver.
    pub fn now(&self) -> ZonedDateTime {
        self.from_utc(self.inner.oracle.now())
    }

    fn claim(&self, dt: &ZonedDateTime) -> WallClock {
        match dt.zone() {
            Zone::Local(zone) if zone.is_same_instance(self) => dt.wall(),
            other => panic!(
                "datetime tagged with zone '{other}' was passed to system zone '{self}'; \
                 resolve values only with the zone that produced them"
            ),
        }
    }
}

impl Default for SystemZone {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for SystemZone {
    fn eq(&self, other: &Self) -> bool {
        self.inner.oracle.source_id() == other.inner.oracle.source_id()
    }
}

impl Eq for SystemZone {}

impl fmt::Display for SystemZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.inner.name.as_deref().unwrap_or("system"))
    }
}

/// A timezone a [`ZonedDateTime`] can be tagged with.
#[derive(Debug, Clone, PartialEq)]
pub enum Zone {
    /// Coordinated universal time.
    Utc,
    /// A constant offset from UTC with no transition rules.
    Fixed(FixedOffset),
    /// A named zone from the bundled tzdata snapshot.
    Named(Tz),
    /// The system-timezone resolver.
    Local(SystemZone),
}

impl Zone {
    /// Looks up a zone by IANA name.
    pub fn named(name: &str) -> crate::error::Result<Zone> {
        name.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| TzFoldError::InvalidTimezone(name.to_string()))
    }

    /// A fresh system-timezone resolver.
    pub fn system() -> Zone {
        Zone::Local(SystemZone::new())
    }

    /// A constant offset of `offset_secs` seconds east of UTC.
    pub fn fixed(offset_secs: i32) -> crate::error::Result<Zone> {
        FixedOffset::east_opt(offset_secs)
            .map(Zone::Fixed)
            .ok_or_else(|| TzFoldError::OutOfRange(format!("fixed offset {offset_secs}s")))
    }

    /// UTC offset at `dt`, or at the current moment when `dt` is `None`.
    ///
    /// # Panics
    ///
    /// Panics when `dt` is tagged with a different zone.
    pub fn utc_offset(&self, dt: Option<&ZonedDateTime>) -> Duration {
        let wall = dt.map(|dt| self.claimed_wall(dt));
        match self {
            Zone::Utc => Duration::zero(),
            Zone::Fixed(offset) => Duration::seconds(i64::from(offset.local_minus_utc())),
            Zone::Named(tz) => offset_with(&SnapshotOracle::new(*tz), wall),
            Zone::Local(zone) => offset_with(zone.oracle(), wall),
        }
    }

    /// Zone abbreviation at `dt`, or at the current moment when `dt` is
    /// `None`.
    ///
    /// # Panics
    ///
    /// Panics when `dt` is tagged with a different zone.
    pub fn name(&self, dt: Option<&ZonedDateTime>) -> String {
        let wall = dt.map(|dt| self.claimed_wall(dt));
        match self {
            Zone::Utc => "UTC".to_string(),
            Zone::Fixed(offset) => offset_abbreviation(offset.local_minus_utc()),
            Zone::Named(tz) => name_with(&SnapshotOracle::new(*tz), wall),
            Zone::Local(zone) => name_with(zone.oracle(), wall),
        }
    }

    /// Daylight saving delta at `dt`, or at the current moment when `dt`
    /// is `None`. Zones without transition rules report zero, never
    /// `None`.
    ///
    /// # Panics
    ///
    /// Panics when `dt` is tagged with a different zone.
    pub fn dst_delta(&self, dt: Option<&ZonedDateTime>) -> Option<Duration> {
        let wall = dt.map(|dt| self.claimed_wall(dt));
        match self {
            Zone::Utc | Zone::Fixed(_) => Some(Duration::zero()),
            Zone::Named(tz) => dst_with(&SnapshotOracle::new(*tz), wall),
            Zone::Local(zone) => dst_with(zone.oracle(), wall),
        }
    }

    /// Converts an instant to a datetime tagged with this zone, deriving
    /// the fold bit.
    pub fn from_utc(&self, instant: DateTime<Utc>) -> ZonedDateTime {
        match self {
            Zone::Utc => {
                let wall = WallClock::new(instant.naive_utc(), Default::default());
                ZonedDateTime::from_wall(wall, self.clone())
            }
            Zone::Fixed(offset) => {
                let wall = WallClock::new(instant.with_timezone(offset).naive_local(), Default::default());
                ZonedDateTime::from_wall(wall, self.clone())
            }
            Zone::Named(tz) => {
                let oracle = SnapshotOracle::new(*tz);
                let (wall, _) = local_for_instant(&oracle, instant);
                ZonedDateTime::from_wall(wall, self.clone())
            }
            Zone::Local(zone) => zone.from_utc(instant),
        }
    }

    /// The current moment in this zone.
    pub fn now(&self) -> ZonedDateTime {
        let instant = match self {
            Zone::Local(zone) => zone.oracle().now(),
            _ => Utc::now(),
        };
        self.from_utc(instant)
    }

    /// Candidate instants for a wall-clock reading in this zone: one for
    /// ordinary (or skipped, after normalization) readings, two for
    /// readings repeated by a backward transition.
    pub fn candidates(&self, datetime: NaiveDateTime) -> UtcCandidates {
        match self {
            Zone::Utc => UtcCandidates::Unique(ResolvedInstant {
                instant: datetime.and_utc(),
                local: LocalSample {
                    wall: datetime,
                    offset: constant_sample(0, "UTC".to_string()),
                },
            }),
            Zone::Fixed(offset) => {
                let secs = offset.local_minus_utc();
                UtcCandidates::Unique(ResolvedInstant {
                    instant: (datetime - Duration::seconds(i64::from(secs))).and_utc(),
                    local: LocalSample {
                        wall: datetime,
                        offset: constant_sample(secs, offset_abbreviation(secs)),
                    },
                })
            }
            Zone::Named(tz) => utc_candidates_for_wallclock(&SnapshotOracle::new(*tz), datetime),
            Zone::Local(zone) => utc_candidates_for_wallclock(zone.oracle(), datetime),
        }
    }

    /// Resolves a wall-clock reading (with fold) to its instant.
    pub(crate) fn instant_of(&self, wall: &WallClock) -> DateTime<Utc> {
        match self {
            Zone::Utc => wall.datetime.and_utc(),
            Zone::Fixed(offset) => {
                (wall.datetime - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
            }
            Zone::Named(tz) => resolve_wall_clock(&SnapshotOracle::new(*tz), wall).instant,
            Zone::Local(zone) => resolve_wall_clock(zone.oracle(), wall).instant,
        }
    }

    /// Whether `other` is the same zone tag, with resolver instances
    /// compared by identity rather than configuration.
    pub(crate) fn same_tag(&self, other: &Zone) -> bool {
        match (self, other) {
            (Zone::Local(a), Zone::Local(b)) => a.is_same_instance(b),
            _ => self == other,
        }
    }

    fn claimed_wall(&self, dt: &ZonedDateTime) -> WallClock {
        assert!(
            self.same_tag(dt.zone()),
            "datetime tagged with zone '{}' was passed to zone '{}'; \
             resolve values only with the zone that produced them",
            dt.zone(),
            self
        );
        dt.wall()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Utc => f.write_str("UTC"),
            Zone::Fixed(offset) => f.write_str(&offset_abbreviation(offset.local_minus_utc())),
            Zone::Named(tz) => f.write_str(tz.name()),
            Zone::Local(zone) => zone.fmt(f),
        }
    }
}

impl FromStr for Zone {
    type Err = TzFoldError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "utc" => return Ok(Zone::Utc),
            "system" | "local" => return Ok(Zone::system()),
            _ => {}
        }
        if let Some(offset) = parse_fixed_offset(trimmed) {
            return Ok(Zone::Fixed(offset));
        }
        trimmed
            .parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| TzFoldError::InvalidTimezone(trimmed.to_string()))
    }
}

/// Parses `+HH`, `+HHMM` and `+HH:MM` style offsets.
fn parse_fixed_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    if !rest.is_char_boundary(2) {
        return None;
    }
    let (hours, minutes): (i32, i32) = match rest.len() {
        2 => (rest.parse().ok()?, 0),
        4 => (rest[..2].parse().ok()?, rest[2..].parse().ok()?),
        5 if rest.as_bytes()[2] == b':' => (rest[..2].parse().ok()?, rest[3..].parse().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn constant_sample(offset_secs: i32, abbreviation: String) -> OffsetSample {
    OffsetSample {
        utc_offset_secs: offset_secs,
        dst_offset_secs: Some(0),
        abbreviation,
        status: DstStatus::Standard,
    }
}

fn offset_with(oracle: &dyn OffsetOracle, wall: Option<WallClock>) -> Duration {
    match wall {
        Some(wall) => resolve_wall_clock(oracle, &wall).local.offset.utc_offset(),
        None => oracle.sample_instant(oracle.now()).offset.utc_offset(),
    }
}

fn name_with(oracle: &dyn OffsetOracle, wall: Option<WallClock>) -> String {
    match wall {
        Some(wall) => resolve_wall_clock(oracle, &wall).local.offset.abbreviation,
        None => oracle.sample_instant(oracle.now()).offset.abbreviation,
    }
}

fn dst_with(oracle: &dyn OffsetOracle, wall: Option<WallClock>) -> Option<Duration> {
    match wall {
        Some(wall) => {
            let resolved = resolve_wall_clock(oracle, &wall);
            dst_delta_at(oracle, resolved.instant, &resolved.local)
        }
        None => {
            let now = oracle.now();
            let local = oracle.sample_instant(now);
            dst_delta_at(oracle, now, &local)
        }
    }
}
