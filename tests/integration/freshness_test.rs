//! Freshness validation properties and reference scenarios

use chrono::{DateTime, Duration, FixedOffset};
use nse_relay::freshness::{
    assess, check_freshness, parse_vendor_timestamp, Age, CanonicalInstant, FreshnessVerdict,
    Rejection,
};
use proptest::prelude::*;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn base() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2025-08-11T12:00:00+05:30").unwrap()
}

fn shifted(seconds: i64) -> CanonicalInstant {
    CanonicalInstant::from_datetime(&(base() + Duration::seconds(seconds)))
}

fn at(raw: &str) -> CanonicalInstant {
    CanonicalInstant::from_rfc3339(raw).unwrap()
}

proptest! {
    #[test]
    fn prop_well_formed_timestamps_keep_their_digits(
        day in 1u32..=28,
        month in 0usize..12,
        year in 1970u32..=2099,
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
    ) {
        let raw = format!("{day:02}-{}-{year:04} {hour:02}:{minute:02}:{second:02}", MONTHS[month]);
        let instant = parse_vendor_timestamp(&raw).unwrap();
        prop_assert_eq!(
            instant.to_string(),
            format!("{year:04}-{:02}-{day:02}T{hour:02}:{minute:02}:{second:02}+05:30", month + 1)
        );
    }

    #[test]
    fn prop_parser_never_panics(raw in "\\PC{0,40}") {
        let _ = parse_vendor_timestamp(&raw);
    }

    #[test]
    fn prop_unknown_months_fail(month in "[A-Za-z]{3}") {
        prop_assume!(!MONTHS.contains(&month.as_str()));
        let raw = format!("11-{month}-2025 15:29:59");
        prop_assert!(parse_vendor_timestamp(&raw).is_err());
    }

    #[test]
    fn prop_missing_instant_is_never_fresh(max_age in any::<u64>(), offset in -86_400i64..86_400) {
        let now = shifted(offset);
        let verdict = FreshnessVerdict::evaluate(None, &now, max_age);
        prop_assert!(!verdict.is_fresh);
        prop_assert!(!verdict.is_same_day);
        prop_assert_eq!(verdict.age_seconds, Age::Unbounded);
        prop_assert!(check_freshness(None, &now, max_age).is_err());
    }

    #[test]
    fn prop_future_snapshots_have_zero_age(ahead in 0i64..1_000_000) {
        let now = shifted(0);
        let snapshot = shifted(ahead);
        prop_assert_eq!(Age::between(Some(&snapshot), &now), Age::Seconds(0));
    }

    #[test]
    fn prop_exact_threshold_passes(max_age in 0u64..40_000) {
        let now = shifted(0);
        let snapshot = shifted(-i64::try_from(max_age).unwrap());
        prop_assert_eq!(check_freshness(Some(&snapshot), &now, max_age), Ok(max_age));
        if max_age > 0 {
            prop_assert!(check_freshness(Some(&snapshot), &now, max_age - 1).is_err());
        }
    }
}

#[test]
fn test_scenario_fresh() {
    let fresh = assess(Some("11-Aug-2025 15:29:59"), &at("2025-08-11T15:30:09+05:30"), 900).unwrap();
    assert_eq!(fresh.ts_ist.to_string(), "2025-08-11T15:29:59+05:30");
    assert_eq!(fresh.age_seconds, 10);
}

#[test]
fn test_scenario_next_day() {
    let err = assess(Some("11-Aug-2025 15:29:59"), &at("2025-08-12T09:00:00+05:30"), 900).unwrap_err();
    match err {
        Rejection::WrongDate {
            expected_day,
            got_day,
            ..
        } => {
            assert_eq!(expected_day, "2025-08-12");
            assert_eq!(got_day.as_deref(), Some("2025-08-11"));
        }
        other => panic!("expected WrongDate, got {other:?}"),
    }
}

#[test]
fn test_scenario_too_old() {
    let err = assess(Some("11-Aug-2025 15:29:59"), &at("2025-08-11T15:45:59+05:30"), 900).unwrap_err();
    match err {
        Rejection::DataTooOld {
            age_seconds,
            max_age_seconds,
            ..
        } => {
            assert_eq!(age_seconds, Age::Seconds(960));
            assert_eq!(max_age_seconds, 900);
        }
        other => panic!("expected DataTooOld, got {other:?}"),
    }
}

#[test]
fn test_scenario_null_timestamp() {
    let err = assess(None, &at("2025-08-11T15:45:59+05:30"), 900).unwrap_err();
    assert!(matches!(err, Rejection::WrongDate { got_day: None, .. }));
}
