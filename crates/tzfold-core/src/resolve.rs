//! Fold-aware conversion between wall-clock readings and instants.
//!
//! These functions implement the disambiguation algorithm over any
//! [`OffsetOracle`]: a primary guess, a probe of the opposite DST
//! interpretation, and a UTC-offset comparison deciding whether the
//! reading is repeated. The earlier occurrence of a repeated reading
//! always carries the numerically larger offset, because a backward
//! transition moves the offset down.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::models::{DstHint, DstStatus, Fold, LocalSample, WallClock};
use crate::oracle::OffsetOracle;

/// One fully resolved interpretation of a wall-clock reading.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInstant {
    /// The instant this interpretation denotes.
    pub instant: DateTime<Utc>,
    /// Wall-clock fields and offset information at that instant. The
    /// fields can differ from the requested reading when the reading fell
    /// inside a skipped range and was normalized out of it.
    pub local: LocalSample,
}

/// Outcome of mapping wall-clock fields toward UTC: one instant, or the
/// two instants of a reading repeated by a backward transition.
#[derive(Debug, Clone, PartialEq)]
pub enum UtcCandidates {
    /// Exactly one instant.
    Unique(ResolvedInstant),
    /// A repeated reading; `earlier` is the first occurrence (larger UTC
    /// offset), `later` the second.
    Ambiguous {
        earlier: ResolvedInstant,
        later: ResolvedInstant,
    },
}

impl UtcCandidates {
    /// Picks the candidate a fold bit denotes. For a unique resolution
    /// the fold is irrelevant and ignored.
    pub fn select(self, fold: Fold) -> ResolvedInstant {
        match self {
            UtcCandidates::Unique(resolved) => resolved,
            UtcCandidates::Ambiguous { earlier, later } => match fold {
                Fold::First => earlier,
                Fold::Second => later,
            },
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, UtcCandidates::Ambiguous { .. })
    }
}

/// Maps wall-clock fields (fold not yet applied) to their candidate
/// instants.
///
/// The primary guess resolves the reading with no DST preference. Its
/// sample is then probed with the opposite DST status; if that probe
/// lands on a different instant whose UTC offset also differs, the
/// reading is repeated and both interpretations are returned. Skipped
/// readings come back as a single normalized candidate, never an error.
pub fn utc_candidates_for_wallclock(
    oracle: &dyn OffsetOracle,
    wall: NaiveDateTime,
) -> UtcCandidates {
    let primary_instant = oracle.resolve_wallclock(wall, DstHint::Detect);
    let primary = oracle.sample_instant(primary_instant);

    let Some(flipped) = primary.offset.status.flipped() else {
        return UtcCandidates::Unique(ResolvedInstant {
            instant: primary_instant,
            local: primary,
        });
    };

    // Probe the opposite interpretation of the normalized fields.
    let alternate_instant = oracle.resolve_wallclock(primary.wall, flipped);
    if alternate_instant == primary_instant {
        return UtcCandidates::Unique(ResolvedInstant {
            instant: primary_instant,
            local: primary,
        });
    }

    let alternate = oracle.sample_instant(alternate_instant);
    if alternate.offset.utc_offset_secs == primary.offset.utc_offset_secs {
        return UtcCandidates::Unique(ResolvedInstant {
            instant: primary_instant,
            local: primary,
        });
    }

    let primary = ResolvedInstant {
        instant: primary_instant,
        local: primary,
    };
    let alternate = ResolvedInstant {
        instant: alternate_instant,
        local: alternate,
    };
    let (earlier, later) = if primary.local.offset.utc_offset_secs
        > alternate.local.offset.utc_offset_secs
    {
        (primary, alternate)
    } else {
        (alternate, primary)
    };
    UtcCandidates::Ambiguous { earlier, later }
}

/// Resolves a wall-clock reading, applying its fold bit.
pub fn resolve_wall_clock(oracle: &dyn OffsetOracle, wall: &WallClock) -> ResolvedInstant {
    utc_candidates_for_wallclock(oracle, wall.datetime).select(wall.fold)
}

/// Converts an instant to its local reading, deriving the fold bit.
///
/// The fold is `Second` exactly when re-resolving the computed fields
/// toward UTC under the opposite DST status lands strictly earlier with a
/// strictly larger offset, i.e. the instant arrived after the clocks
/// moved back through this reading.
pub fn local_for_instant(
    oracle: &dyn OffsetOracle,
    instant: DateTime<Utc>,
) -> (WallClock, LocalSample) {
    let local = oracle.sample_instant(instant);
    let fold = fold_for_instant(oracle, instant, &local);
    (WallClock::new(local.wall, fold), local)
}

fn fold_for_instant(oracle: &dyn OffsetOracle, instant: DateTime<Utc>, local: &LocalSample) -> Fold {
    let Some(flipped) = local.offset.status.flipped() else {
        return Fold::First;
    };
    let alternate = oracle.resolve_wallclock(local.wall, flipped);
    if alternate >= instant {
        return Fold::First;
    }
    let alternate_sample = oracle.sample_instant(alternate);
    if local.offset.utc_offset_secs < alternate_sample.offset.utc_offset_secs {
        Fold::Second
    } else {
        Fold::First
    }
}

/// Daylight saving delta at a resolved instant.
///
/// Returns `None` only when the sample's status is unknown and zero when
/// DST is simply not in effect. When the status is known but the sample
/// carries no delta, the same reading is reinterpreted as standard time
/// and the distance between the two instants is the delta.
pub fn dst_delta_at(
    oracle: &dyn OffsetOracle,
    instant: DateTime<Utc>,
    local: &LocalSample,
) -> Option<Duration> {
    match local.offset.status {
        DstStatus::Unknown => None,
        DstStatus::Standard => Some(Duration::zero()),
        DstStatus::Daylight => {
            if let Some(secs) = local.offset.dst_offset_secs {
                return Some(Duration::seconds(i64::from(secs)));
            }
            let standard = oracle.resolve_wallclock(local.wall, DstHint::Standard);
            Some(standard - instant)
        }
    }
}
