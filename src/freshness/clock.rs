//! Current-time provider

use super::CanonicalInstant;
use chrono::Utc;

/// Source of "now" for the freshness checks
pub trait Clock: Send + Sync {
    /// Current instant in IST
    fn now(&self) -> CanonicalInstant;
}

/// Wall clock, converted to IST through the tz database
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> CanonicalInstant {
        CanonicalInstant::from_datetime(&Utc::now())
    }
}

/// A clock pinned to one instant
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: CanonicalInstant,
}

impl FixedClock {
    pub fn new(instant: CanonicalInstant) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> CanonicalInstant {
        self.instant.clone()
    }
}
