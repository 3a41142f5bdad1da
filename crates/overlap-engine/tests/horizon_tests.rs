//! Tests for horizon bounds, construction and deserialization.

use chrono::{Duration, NaiveDate, NaiveTime};
use overlap_engine::horizon::MAX_HORIZON_DAYS;
use overlap_engine::meeting::find_meeting_candidate;
use overlap_engine::{EmployeeAvailability, Horizon, OverlapError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn nine_to_five(id: u64, tz: &str) -> EmployeeAvailability {
    EmployeeAvailability::new(
        id,
        tz,
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    )
}

#[test]
fn dates_are_consecutive_and_bounded() {
    let horizon = Horizon::new(date(2026, 2, 27), 3).unwrap();
    let dates: Vec<NaiveDate> = horizon.dates().collect();
    assert_eq!(dates, vec![date(2026, 2, 27), date(2026, 2, 28), date(2026, 3, 1)]);
    assert!(horizon.contains(date(2026, 3, 1)));
    assert!(!horizon.contains(date(2026, 3, 2)));
    assert!(!horizon.contains(date(2026, 2, 26)));
}

#[test]
fn non_positive_days_rejected() {
    for days in [0, -1, i64::MIN] {
        assert!(matches!(
            Horizon::new(date(2026, 3, 16), days),
            Err(OverlapError::InvalidInput(_))
        ));
    }
}

#[test]
fn overlong_horizon_rejected() {
    assert!(Horizon::new(date(2026, 3, 16), MAX_HORIZON_DAYS).is_ok());
    for days in [MAX_HORIZON_DAYS + 1, 4_000_000_000] {
        assert!(matches!(
            Horizon::new(date(2026, 3, 16), days),
            Err(OverlapError::InvalidInput(_))
        ));
    }
}

#[test]
fn deserialize_rejects_zero_day_horizon() {
    let result: Result<Horizon, _> = serde_json::from_str(r#"{"start":"2026-03-16","days":0}"#);
    assert!(result.is_err(), "zero-day horizon must not deserialize");

    let result: Result<Horizon, _> = serde_json::from_str(r#"{"start":"2026-03-16","days":-3}"#);
    assert!(result.is_err());

    let too_long = format!(r#"{{"start":"2026-03-16","days":{}}}"#, MAX_HORIZON_DAYS + 1);
    assert!(serde_json::from_str::<Horizon>(&too_long).is_err());
}

#[test]
fn deserialized_horizon_matches_constructed() {
    let parsed: Horizon = serde_json::from_str(r#"{"start":"2026-03-16","days":5}"#).unwrap();
    assert_eq!(parsed, Horizon::new(date(2026, 3, 16), 5).unwrap());

    let round_trip: Horizon = serde_json::from_str(&serde_json::to_string(&parsed).unwrap()).unwrap();
    assert_eq!(round_trip, parsed);
}

#[test]
fn deserialized_horizon_drives_meeting_search() {
    let team = [nine_to_five(1, "Etc/GMT-1"), nine_to_five(2, "Etc/GMT-5")];
    let horizon: Horizon = serde_json::from_str(r#"{"start":"2026-03-16","days":1}"#).unwrap();

    let candidate = find_meeting_candidate(&team, &horizon, Duration::zero()).unwrap();
    assert_eq!(candidate.date, date(2026, 3, 16));
}
