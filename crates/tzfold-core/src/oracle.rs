//! Offset oracles: the bridge to timezone rule data.
//!
//! An [`OffsetOracle`] answers the two primitive questions everything else
//! is built from: "what does this instant look like on the local clock"
//! and "which instant does this local reading denote". Two implementations
//! are provided: [`SystemOracle`], which re-reads the operating system's
//! configured zone on every call, and [`SnapshotOracle`], which is pinned
//! to one [`chrono_tz::Tz`] and backs both named-zone resolution and
//! deterministic tests.

use std::fmt;

use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::{OffsetComponents, OffsetName, Tz};

use crate::models::{DstHint, DstStatus, LocalSample, OffsetSample, offset_abbreviation};

/// Source of local-time conversions for one zone configuration.
///
/// Implementations must be pure per call: no caching of zone rules across
/// calls is allowed, so that a configuration change (for the system zone)
/// is visible to the very next query. Conversions never fail; a reading
/// inside a skipped range resolves to a nearby valid instant and a
/// platform that cannot report DST status says so via
/// [`DstStatus::Unknown`] instead of guessing.
pub trait OffsetOracle: fmt::Debug + Send + Sync {
    /// Current instant per the live clock.
    fn now(&self) -> DateTime<Utc>;

    /// Converts an instant to its local wall-clock reading and the offset
    /// information in effect at that instant (`localtime` analog).
    fn sample_instant(&self, instant: DateTime<Utc>) -> LocalSample;

    /// Resolves a local wall-clock reading to an instant (`mktime`
    /// analog). For readings repeated by a backward transition the hint
    /// selects the occurrence whose DST status matches; for an
    /// unambiguous reading that contradicts an explicit hint the result
    /// shifts by the DST delta when the delta is determinable, and stays
    /// on the unique reading otherwise; for skipped readings a
    /// neighboring offset is applied and the result normalizes out of
    /// the gap.
    fn resolve_wallclock(&self, wall: NaiveDateTime, hint: DstHint) -> DateTime<Utc>;

    /// Identity of this oracle's configuration; zones compare equal when
    /// their oracles share it.
    fn source_id(&self) -> String;

    /// IANA key of the backing zone, when one is known.
    fn zone_key(&self) -> Option<String>;
}

/// Oracle pinned to a fixed zone from the bundled tzdata snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotOracle {
    tz: Tz,
}

impl SnapshotOracle {
    /// Creates an oracle answering for `tz`.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The backing zone.
    pub fn tz(&self) -> Tz {
        self.tz
    }
}

impl OffsetOracle for SnapshotOracle {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sample_instant(&self, instant: DateTime<Utc>) -> LocalSample {
        sample_in(self.tz, instant)
    }

    fn resolve_wallclock(&self, wall: NaiveDateTime, hint: DstHint) -> DateTime<Utc> {
        resolve_in(self.tz, wall, hint)
    }

    fn source_id(&self) -> String {
        format!("tzdata:{}", self.tz.name())
    }

    fn zone_key(&self) -> Option<String> {
        Some(self.tz.name().to_string())
    }
}

/// Oracle answering for whatever zone the operating system is configured
/// with at the moment of each call.
///
/// Discovery order: the `TZ` environment variable when it names an IANA
/// zone (with or without the leading `:`), then the platform's zone
/// database link, then UTC. The configured zone is looked up again on
/// every call, so a runtime change takes effect immediately. Platforms
/// where `TZ` holds a POSIX rule string rather than an IANA name fall
/// through to the platform link; emulating `tzset` there is out of reach.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOracle;

impl SystemOracle {
    pub fn new() -> Self {
        Self
    }

    fn detect(&self) -> Option<Tz> {
        if let Ok(var) = std::env::var("TZ") {
            let name = var.strip_prefix(':').unwrap_or(&var);
            if let Ok(tz) = name.parse::<Tz>() {
                return Some(tz);
            }
        }
        match iana_time_zone::get_timezone() {
            Ok(name) => match name.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    tracing::warn!(zone = %name, "platform zone is missing from tzdata");
                    None
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "could not determine the system timezone");
                None
            }
        }
    }

    fn current_tz(&self) -> Tz {
        self.detect().unwrap_or(Tz::UTC)
    }
}

impl OffsetOracle for SystemOracle {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sample_instant(&self, instant: DateTime<Utc>) -> LocalSample {
        sample_in(self.current_tz(), instant)
    }

    fn resolve_wallclock(&self, wall: NaiveDateTime, hint: DstHint) -> DateTime<Utc> {
        resolve_in(self.current_tz(), wall, hint)
    }

    fn source_id(&self) -> String {
        "system".to_string()
    }

    fn zone_key(&self) -> Option<String> {
        self.detect().map(|tz| tz.name().to_string())
    }
}

/// Resolves one instant against `tz`.
pub(crate) fn sample_in(tz: Tz, instant: DateTime<Utc>) -> LocalSample {
    let local = tz.from_utc_datetime(&instant.naive_utc());
    let offset = local.offset();
    let utc_offset_secs = offset.fix().local_minus_utc();
    let dst_secs = offset.dst_offset().num_seconds() as i32;
    let abbreviation = offset
        .abbreviation()
        .map(str::to_owned)
        .unwrap_or_else(|| offset_abbreviation(utc_offset_secs));
    LocalSample {
        wall: local.naive_local(),
        offset: OffsetSample {
            utc_offset_secs,
            dst_offset_secs: Some(dst_secs),
            abbreviation,
            status: if dst_secs != 0 {
                DstStatus::Daylight
            } else {
                DstStatus::Standard
            },
        },
    }
}

/// Resolves a wall-clock reading against `tz` under a DST hint.
pub(crate) fn resolve_in(tz: Tz, wall: NaiveDateTime, hint: DstHint) -> DateTime<Utc> {
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(dt) => {
            let dst_secs = dt.offset().dst_offset().num_seconds();
            match hint {
                // The reading exists only as daylight time; reinterpreting
                // it as standard shifts the instant by the delta, the way
                // mktime renormalizes a contradicting tm_isdst.
                DstHint::Standard if dst_secs != 0 => {
                    dt.with_timezone(&Utc) + Duration::seconds(dst_secs)
                }
                // The daylight delta is unknowable while standard time is
                // in effect; keep the unique reading.
                _ => dt.with_timezone(&Utc),
            }
        }
        LocalResult::Ambiguous(first, second) => {
            let wants_daylight = match hint {
                DstHint::Detect => return first.with_timezone(&Utc),
                DstHint::Standard => false,
                DstHint::Daylight => true,
            };
            let first_is_daylight = !first.offset().dst_offset().is_zero();
            let pick = if first_is_daylight == wants_daylight {
                first
            } else {
                second
            };
            pick.with_timezone(&Utc)
        }
        LocalResult::None => resolve_gap(tz, wall, hint),
    }
}

/// Resolves a reading that falls inside a skipped range by borrowing an
/// offset from one side of the transition.
fn resolve_gap(tz: Tz, wall: NaiveDateTime, hint: DstHint) -> DateTime<Utc> {
    let before = find_valid_local(tz, wall, -1);
    let after = find_valid_local(tz, wall, 1);

    let side = match hint {
        DstHint::Detect => before.or(after),
        DstHint::Standard => pick_side(&before, &after, false),
        DstHint::Daylight => pick_side(&before, &after, true),
    };

    match side {
        Some(dt) => {
            let offset_secs = i64::from(dt.offset().fix().local_minus_utc());
            (wall - Duration::seconds(offset_secs)).and_utc()
        }
        // No valid neighbor within the search bound; read the fields as UTC.
        None => wall.and_utc(),
    }
}

fn pick_side(
    before: &Option<DateTime<Tz>>,
    after: &Option<DateTime<Tz>>,
    wants_daylight: bool,
) -> Option<DateTime<Tz>> {
    let matches = |dt: &DateTime<Tz>| !dt.offset().dst_offset().is_zero() == wants_daylight;
    match (before, after) {
        (Some(b), _) if matches(b) => Some(*b),
        (_, Some(a)) if matches(a) => Some(*a),
        (Some(b), _) => Some(*b),
        (_, a) => *a,
    }
}

/// Walks away from `wall` one second at a time and returns the first
/// representable local time in that direction. The two-day bound covers
/// rare historical transitions with large gaps.
fn find_valid_local(tz: Tz, wall: NaiveDateTime, direction: i64) -> Option<DateTime<Tz>> {
    let max_seconds = 2 * 24 * 60 * 60;

    for seconds in 1..=max_seconds {
        let candidate = wall + Duration::seconds(direction * seconds);
        let result = tz.from_local_datetime(&candidate);
        let resolved = if direction < 0 {
            result.single().or_else(|| result.latest())
        } else {
            result.single().or_else(|| result.earliest())
        };
        if let Some(dt) = resolved {
            return Some(dt);
        }
    }

    None
}
