//! Tests for the N-way working-window overlap.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use overlap_engine::overlap::overlap_with_policy;
use overlap_engine::{overlap, DstPolicy, EmployeeAvailability, OverlapError, OverlapResult};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

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

// ── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn utc_plus_one_and_plus_five_share_four_hours() {
    // 09-17 at UTC+1 is 08:00-16:00 UTC; 09-17 at UTC+5 is 04:00-12:00 UTC.
    let team = [nine_to_five(1, "Etc/GMT-1"), nine_to_five(2, "Etc/GMT-5")];

    let result = overlap(&team, date(2026, 3, 16)).unwrap();

    let window = result.window().expect("both windows resolve");
    assert_eq!(window.start(), at("2026-03-16T08:00:00Z"));
    assert_eq!(window.end(), at("2026-03-16T12:00:00Z"));
    assert_eq!(result.duration(), Duration::hours(4));
    assert!(result.is_usable());
    assert_eq!(
        result.boundaries(),
        vec![at("2026-03-16T08:00:00Z"), at("2026-03-16T12:00:00Z")]
    );
}

#[test]
fn single_employee_overlap_is_their_window() {
    let team = [nine_to_five(7, "Asia/Kolkata")];
    let result = overlap(&team, date(2026, 1, 15)).unwrap();
    assert_eq!(
        result.boundaries(),
        vec![at("2026-01-15T03:30:00Z"), at("2026-01-15T11:30:00Z")]
    );
}

#[test]
fn three_way_overlap() {
    let team = [
        nine_to_five(1, "Europe/Berlin"),
        nine_to_five(2, "Asia/Kolkata"),
        nine_to_five(3, "Europe/London"),
    ];
    let result = overlap(&team, date(2026, 1, 15)).unwrap();
    assert_eq!(
        result.boundaries(),
        vec![at("2026-01-15T09:00:00Z"), at("2026-01-15T11:30:00Z")]
    );
    assert_eq!(result.duration(), Duration::minutes(150));
}

#[test]
fn far_apart_zones_have_empty_overlap_not_missing_data() {
    // Tokyo 00:00-08:00 UTC, Los Angeles (PDT) 16:00-24:00 UTC.
    let team = [
        nine_to_five(1, "Asia/Tokyo"),
        nine_to_five(2, "America/Los_Angeles"),
    ];
    let result = overlap(&team, date(2026, 4, 15)).unwrap();

    match &result {
        OverlapResult::Window(w) => assert!(w.is_empty()),
        other => panic!("expected an empty window, got {:?}", other),
    }
    assert!(!result.is_usable());
    assert!(result.boundaries().is_empty());
    assert_eq!(result.duration(), Duration::zero());
}

#[test]
fn empty_employee_set_is_invalid() {
    let result = overlap(&[], date(2026, 3, 16));
    assert!(matches!(result, Err(OverlapError::InvalidInput(_))));
}

#[test]
fn unknown_timezone_fails_the_whole_computation() {
    let team = [nine_to_five(1, "UTC"), nine_to_five(2, "Atlantis/Capital")];
    let result = overlap(&team, date(2026, 3, 16));
    assert_eq!(
        result,
        Err(OverlapError::UnknownTimeZone("Atlantis/Capital".to_string()))
    );
}

#[test]
fn overlap_shifts_when_one_side_changes_offset() {
    // New York 09-17 vs London 06-14: adjacent in February, one hour of overlap
    // once New York is on EDT and London is still on GMT.
    let team = [
        nine_to_five(1, "America/New_York"),
        EmployeeAvailability::new(
            2,
            "Europe/London",
            NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        ),
    ];

    let before = overlap(&team, date(2026, 3, 7)).unwrap();
    assert!(!before.is_usable());

    let after = overlap(&team, date(2026, 3, 8)).unwrap();
    assert_eq!(
        after.boundaries(),
        vec![at("2026-03-08T13:00:00Z"), at("2026-03-08T14:00:00Z")]
    );
}

#[test]
fn skipped_window_reports_missing_participant() {
    let early_bird = EmployeeAvailability::new(
        42,
        "America/New_York",
        NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    );
    let team = [nine_to_five(1, "Europe/London"), early_bird];

    let result = overlap_with_policy(&team, date(2026, 3, 8), DstPolicy::Skip).unwrap();
    assert_eq!(result, OverlapResult::NoData { missing: vec![42] });
    assert!(result.window().is_none());
    assert!(result.boundaries().is_empty());

    // Under the default policy the same team has a window.
    let default = overlap(&team, date(2026, 3, 8)).unwrap();
    assert!(default.window().is_some());
}

#[test]
fn overlap_result_serializes_with_kind_tag() {
    let team = [nine_to_five(1, "UTC")];
    let result = overlap(&team, date(2026, 3, 16)).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["kind"], "window");
    assert_eq!(json["start"], "2026-03-16T09:00:00Z");

    let none = OverlapResult::NoData { missing: vec![3] };
    let json = serde_json::to_value(&none).unwrap();
    assert_eq!(json["kind"], "no_data");
    assert_eq!(json["missing"][0], 3);
}
