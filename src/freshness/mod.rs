//! Snapshot freshness validation
//!
//! Decides whether a vendor-reported update time belongs to the current IST
//! day and is recent enough to serve. Everything here is pure and
//! synchronous: the only inputs are the timestamp string, "now", and the
//! maximum allowed age.

mod clock;
mod guard;
mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use guard::{check_freshness, check_same_day, Age, FreshnessVerdict, Rejection};
pub use timestamp::{
    canonicalize, parse_vendor_timestamp, CanonicalInstant, TimestampError, IST_OFFSET,
};

use serde::Serialize;

/// A snapshot that passed both guards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fresh {
    pub ts_ist: CanonicalInstant,
    pub age_seconds: u64,
}

/// Validate a vendor timestamp: same-day guard first, then freshness
///
/// Unparseable or absent timestamps fail the same-day guard with no `got_day`.
pub fn assess(
    vendor_timestamp: Option<&str>,
    now: &CanonicalInstant,
    max_age_seconds: u64,
) -> Result<Fresh, Rejection> {
    let instant = canonicalize(vendor_timestamp);
    assess_instant(instant.as_ref(), now, max_age_seconds)
}

/// Same as [`assess`] for an already canonicalized instant
pub fn assess_instant(
    instant: Option<&CanonicalInstant>,
    now: &CanonicalInstant,
    max_age_seconds: u64,
) -> Result<Fresh, Rejection> {
    check_same_day(instant, now)?;
    let age_seconds = check_freshness(instant, now, max_age_seconds)?;

    instant
        .map(|ts| Fresh {
            ts_ist: ts.clone(),
            age_seconds,
        })
        .ok_or_else(|| Rejection::WrongDate {
            expected_day: now.day(),
            got_day: None,
            ts_ist: None,
        })
}
