//! Vendor timestamp parsing
//!
//! NSE reports its last update as `DD-Mon-YYYY HH:MM:SS` in IST, e.g.
//! `11-Aug-2025 15:29:59`. The parser reassembles that into an ISO-8601
//! instant with an explicit `+05:30` offset without any timezone arithmetic.

use chrono::{DateTime, FixedOffset, SubsecRound, TimeZone};
use chrono_tz::Asia::Kolkata;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Offset suffix every canonical instant carries
pub const IST_OFFSET: &str = "+05:30";

const MONTHS: [(&str, &str); 12] = [
    ("Jan", "01"),
    ("Feb", "02"),
    ("Mar", "03"),
    ("Apr", "04"),
    ("May", "05"),
    ("Jun", "06"),
    ("Jul", "07"),
    ("Aug", "08"),
    ("Sep", "09"),
    ("Oct", "10"),
    ("Nov", "11"),
    ("Dec", "12"),
];

/// Why a vendor timestamp could not be canonicalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("expected `DD-Mon-YYYY HH:MM:SS`, got {0:?}")]
    Malformed(String),

    #[error("{field} must be {width} digits, got {value:?}")]
    NonNumeric {
        field: &'static str,
        value: String,
        width: usize,
    },

    #[error("unknown month abbreviation {0:?}")]
    UnknownMonth(String),

    #[error("{0:?} is not a valid calendar date and time")]
    OutOfRange(String),
}

/// An instant expressed in IST, rendered as `YYYY-MM-DDTHH:MM:SS+05:30`
///
/// Always whole seconds and always carrying the IST offset, so the first ten
/// characters of the rendering are the IST calendar day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalInstant(DateTime<FixedOffset>);

impl CanonicalInstant {
    /// Re-express any zoned time in IST, dropping sub-second precision
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.with_timezone(&Kolkata).fixed_offset().trunc_subsecs(0))
    }

    /// Parse an RFC 3339 string (any offset) and re-express it in IST
    pub fn from_rfc3339(raw: &str) -> Result<Self, TimestampError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Self::from_datetime(&dt))
            .map_err(|_| TimestampError::OutOfRange(raw.to_string()))
    }

    /// The IST calendar day, `YYYY-MM-DD`
    pub fn day(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }
}

impl fmt::Display for CanonicalInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%:z"))
    }
}

impl Serialize for CanonicalInstant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a vendor timestamp into its canonical IST instant
pub fn parse_vendor_timestamp(raw: &str) -> Result<CanonicalInstant, TimestampError> {
    let malformed = || TimestampError::Malformed(raw.to_string());

    let (date, time) = split2(raw, ' ').ok_or_else(malformed)?;
    let (day, month, year) = split3(date, '-').ok_or_else(malformed)?;
    let (hour, minute, second) = split3(time, ':').ok_or_else(malformed)?;

    let day = digits("day", day, 2)?;
    let month = month_number(month)?;
    let year = digits("year", year, 4)?;
    let hour = digits("hour", hour, 2)?;
    let minute = digits("minute", minute, 2)?;
    let second = digits("second", second, 2)?;

    let iso = format!("{year}-{month}-{day}T{hour}:{minute}:{second}{IST_OFFSET}");
    DateTime::parse_from_rfc3339(&iso)
        .map(CanonicalInstant)
        .map_err(|_| TimestampError::OutOfRange(raw.to_string()))
}

/// Canonicalize an optional vendor timestamp, treating any failure as absent
pub fn canonicalize(raw: Option<&str>) -> Option<CanonicalInstant> {
    let raw = raw?;
    match parse_vendor_timestamp(raw) {
        Ok(instant) => Some(instant),
        Err(e) => {
            tracing::debug!(error = %e, "Vendor timestamp rejected");
            None
        }
    }
}

fn month_number(abbrev: &str) -> Result<&'static str, TimestampError> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == abbrev)
        .map(|(_, number)| *number)
        .ok_or_else(|| TimestampError::UnknownMonth(abbrev.to_string()))
}

fn digits<'a>(field: &'static str, value: &'a str, width: usize) -> Result<&'a str, TimestampError> {
    if value.len() == width && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(value)
    } else {
        Err(TimestampError::NonNumeric {
            field,
            value: value.to_string(),
            width,
        })
    }
}

fn split2(s: &str, sep: char) -> Option<(&str, &str)> {
    let mut parts = s.split(sep);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Some((a, b)),
        _ => None,
    }
}

fn split3(s: &str, sep: char) -> Option<(&str, &str, &str)> {
    let mut parts = s.split(sep);
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), Some(c), None) => Some((a, b, c)),
        _ => None,
    }
}
