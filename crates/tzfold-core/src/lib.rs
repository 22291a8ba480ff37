//! # tzfold-core
//!
//! A fold-aware timezone resolution library for Rust.
//!
//! This library provides datetimes that provably carry timezone
//! information, and a system-timezone resolver that answers offset, DST
//! and abbreviation queries correctly across daylight saving transitions,
//! including the repeated hour of a backward transition (the "fold").
//!
//! ## Features
//!
//! - **Awareness by construction**: a [`ZonedDateTime`] cannot exist
//!   without a [`Zone`] tag, removing the naive-vs-aware class of bugs.
//! - **Fold disambiguation**: the repeated wall-clock hour of a backward
//!   transition resolves deterministically in both directions, including
//!   negative DST (Europe/Dublin), half-hour shifts (Australia/Lord_Howe)
//!   and simultaneous rule changes (America/Scoresbysund).
//! - **Live system zone**: [`SystemZone`] re-reads the operating system's
//!   configuration on every call, so runtime zone changes are honored.
//! - **Injectable oracle**: resolution runs against an [`OffsetOracle`],
//!   so tests substitute a [`SnapshotOracle`] pinned to a fixed tzdata
//!   zone instead of depending on the host's configuration.
//! - **IANA Timezones**: full zone coverage via chrono-tz.
//!
//! ## Example
//!
//! ```rust
//! use tzfold_core::prelude::*;
//!
//! // The hour repeated by the fall-back transition resolves by fold.
//! let zone = Zone::named("America/St_Johns").unwrap();
//! let second = ZonedDateTime::from_timestamp(1699158600, 0, zone.clone()).unwrap();
//! assert_eq!(second.fold(), Fold::Second);
//! assert_eq!(second.tzname(), "NST");
//!
//! let first = ZonedDateTime::from_timestamp(1699155000, 0, zone).unwrap();
//! assert_eq!(first.fold(), Fold::First);
//! assert_eq!(first.tzname(), "NDT");
//! // Same wall-clock reading, one hour apart.
//! assert_eq!(first.naive_local(), second.naive_local());
//! ```

pub mod datetime;
pub mod error;
pub mod models;
pub mod oracle;
pub mod parse;
pub mod resolve;
pub mod zone;

// Re-export commonly used types at the crate root
pub use datetime::ZonedDateTime;
pub use error::{Result, TzFoldError};
pub use models::{DstHint, DstStatus, Fold, LocalSample, OffsetSample, WallClock};
pub use oracle::{OffsetOracle, SnapshotOracle, SystemOracle};
pub use parse::{TimestampFormat, parse_timestamp, parse_timestamp_auto};
pub use resolve::{ResolvedInstant, UtcCandidates, utc_candidates_for_wallclock};
pub use zone::{SystemZone, Zone};

/// Prelude module for convenient imports.
///
/// ```
/// use tzfold_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::datetime::ZonedDateTime;
    pub use crate::error::{Result, TzFoldError};
    pub use crate::models::*;
    pub use crate::oracle::{OffsetOracle, SnapshotOracle, SystemOracle};
    pub use crate::parse::{TimestampFormat, parse_local_naive, parse_timestamp, parse_timestamp_auto};
    pub use crate::resolve::*;
    pub use crate::zone::{SystemZone, Zone};
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn full_workflow_fold_resolution() {
        let instant = parse_timestamp("2023-11-05T04:30:00Z", TimestampFormat::Rfc3339).unwrap();
        let zone = Zone::named("America/St_Johns").unwrap();
        let dt = ZonedDateTime::from_instant(instant, zone);

        assert_eq!(dt.to_rfc3339(), "2023-11-05T01:00:00-03:30");
        assert_eq!(dt.fold(), Fold::Second);
        assert_eq!(dt.dst(), Some(Duration::zero()));
        assert_eq!(dt.in_zone(&Zone::Utc).to_rfc3339(), "2023-11-05T04:30:00+00:00");
    }

    #[test]
    fn full_workflow_system_zone() {
        let zone = SystemZone::with_oracle(SnapshotOracle::new("Europe/Dublin".parse().unwrap()));
        let dt = zone.from_utc(parse_timestamp("1672531200", TimestampFormat::EpochS).unwrap());

        // Dublin's winter GMT is its daylight period; the delta is negative.
        assert_eq!(zone.utc_offset(Some(&dt)), Duration::zero());
        assert_eq!(zone.dst_delta(Some(&dt)), Some(Duration::seconds(-3600)));
        assert_eq!(zone.name(Some(&dt)), "GMT");
    }

    #[test]
    fn prelude_exports() {
        use crate::prelude::*;

        let _zone: Zone = "utc".parse().unwrap();
        let _format = TimestampFormat::EpochMs;
        let _fold = Fold::First;
    }
}
