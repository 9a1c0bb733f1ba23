//! Same-day and freshness guards

use super::CanonicalInstant;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Age of a snapshot relative to now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Age {
    /// Whole seconds, rounded half-up, never negative
    Seconds(u64),
    /// No instant to measure from
    Unbounded,
}

impl Age {
    /// Age of `instant` at `now`; future-dated instants clamp to zero
    pub fn between(instant: Option<&CanonicalInstant>, now: &CanonicalInstant) -> Self {
        let Some(instant) = instant else {
            return Age::Unbounded;
        };

        let millis = now
            .as_datetime()
            .signed_duration_since(*instant.as_datetime())
            .num_milliseconds();
        if millis <= 0 {
            return Age::Seconds(0);
        }
        Age::Seconds(u64::try_from(millis.saturating_add(500) / 1000).unwrap_or(u64::MAX))
    }

    /// Inclusive comparison against a threshold
    pub fn within(&self, max_age_seconds: u64) -> bool {
        match self {
            Age::Seconds(secs) => *secs <= max_age_seconds,
            Age::Unbounded => false,
        }
    }

    pub fn seconds(&self) -> Option<u64> {
        match self {
            Age::Seconds(secs) => Some(*secs),
            Age::Unbounded => None,
        }
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Seconds(secs) => write!(f, "{secs}s"),
            Age::Unbounded => f.write_str("unbounded"),
        }
    }
}

impl Serialize for Age {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Age::Seconds(secs) => serializer.serialize_u64(*secs),
            Age::Unbounded => serializer.serialize_none(),
        }
    }
}

/// Both guards evaluated side by side, without short-circuiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreshnessVerdict {
    pub is_same_day: bool,
    pub age_seconds: Age,
    pub max_age_seconds: u64,
    pub is_fresh: bool,
}

impl FreshnessVerdict {
    pub fn evaluate(
        instant: Option<&CanonicalInstant>,
        now: &CanonicalInstant,
        max_age_seconds: u64,
    ) -> Self {
        let age = Age::between(instant, now);
        Self {
            is_same_day: check_same_day(instant, now).is_ok(),
            age_seconds: age,
            max_age_seconds,
            is_fresh: age.within(max_age_seconds),
        }
    }
}

/// Reason a snapshot was refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "error", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rejection {
    /// Snapshot belongs to another IST day, or has no usable timestamp
    #[error("snapshot day {got_day:?} does not match today {expected_day}")]
    WrongDate {
        expected_day: String,
        got_day: Option<String>,
        ts_ist: Option<CanonicalInstant>,
    },

    /// Snapshot is from today but older than allowed
    #[error("snapshot age {age_seconds} exceeds {max_age_seconds}s")]
    DataTooOld {
        age_seconds: Age,
        max_age_seconds: u64,
        ts_ist: Option<CanonicalInstant>,
    },
}

impl Rejection {
    /// Wire code carried in the `error` field
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::WrongDate { .. } => "WRONG_DATE",
            Rejection::DataTooOld { .. } => "DATA_TOO_OLD",
        }
    }
}

/// Fails unless `instant` falls on the same IST day as `now`
pub fn check_same_day(
    instant: Option<&CanonicalInstant>,
    now: &CanonicalInstant,
) -> Result<(), Rejection> {
    let expected_day = now.day();
    let got_day = instant.map(CanonicalInstant::day);

    if got_day.as_deref() == Some(expected_day.as_str()) {
        return Ok(());
    }

    Err(Rejection::WrongDate {
        expected_day,
        got_day,
        ts_ist: instant.cloned(),
    })
}

/// Fails when the age of `instant` exceeds `max_age_seconds`; returns the age
pub fn check_freshness(
    instant: Option<&CanonicalInstant>,
    now: &CanonicalInstant,
    max_age_seconds: u64,
) -> Result<u64, Rejection> {
    let age = Age::between(instant, now);
    match age {
        Age::Seconds(secs) if age.within(max_age_seconds) => Ok(secs),
        _ => Err(Rejection::DataTooOld {
            age_seconds: age,
            max_age_seconds,
            ts_ist: instant.cloned(),
        }),
    }
}
