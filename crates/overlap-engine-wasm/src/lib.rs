//! WASM bindings for overlap-engine.
//!
//! Exposes the common-window, meeting-search and free-time operations to
//! JavaScript via `wasm-bindgen`. Rosters, id lists and results cross the
//! boundary as JSON strings; dates are `YYYY-MM-DD` and instants RFC 3339.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p overlap-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/overlap-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/overlap_engine_wasm.wasm
//! # Rename .js -> .cjs for ESM compatibility
//! mv packages/overlap-engine-js/wasm/overlap_engine_wasm.js \
//!    packages/overlap-engine-js/wasm/overlap_engine_wasm.cjs
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate};
use overlap_engine::freebusy::team_free_overlap_with_policy;
use overlap_engine::meeting::find_meeting_candidate;
use overlap_engine::overlap::overlap_with_policy;
use overlap_engine::{
    find_team_free_slots, free_time, is_valid_meeting_time, parse_timezone, DstPolicy, EmployeeId,
    FreeSlot, Horizon, OverlapError, Roster,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct FreeSlotDto {
    start: String,
    end: String,
    duration_minutes: i64,
}

impl From<&FreeSlot> for FreeSlotDto {
    fn from(s: &FreeSlot) -> Self {
        Self {
            start: s.start.to_rfc3339(),
            end: s.end.to_rfc3339(),
            duration_minutes: s.duration_minutes,
        }
    }
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

fn parse_roster(json: &str) -> Result<Roster, String> {
    Roster::from_json(json).map_err(|e| e.to_string())
}

/// Parse a JSON array of employee ids, e.g. `[1, 2, 3]`.
fn parse_ids(json: &str) -> Result<Vec<EmployeeId>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid employee ids JSON: {}", e))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn parse_policy(policy: Option<&str>) -> Result<DstPolicy, String> {
    policy
        .map(str::parse)
        .transpose()
        .map(Option::unwrap_or_default)
        .map_err(|e: OverlapError| e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn to_js(result: Result<String, String>) -> Result<String, JsValue> {
    result.map_err(|e| JsValue::from_str(&e))
}

// ---------------------------------------------------------------------------
// Operations on plain Rust types
// ---------------------------------------------------------------------------

fn compute_overlap_json(
    roster_json: &str,
    ids_json: &str,
    date: &str,
    dst_policy: Option<&str>,
) -> Result<String, String> {
    let roster = parse_roster(roster_json)?;
    let team = roster
        .select(&parse_ids(ids_json)?)
        .map_err(|e| e.to_string())?;
    let result = overlap_with_policy(&team, parse_date(date)?, parse_policy(dst_policy)?)
        .map_err(|e| e.to_string())?;

    let boundaries: Vec<String> = result.boundaries().iter().map(|t| t.to_rfc3339()).collect();
    to_json(&boundaries)
}

fn suggest_meeting_json(
    roster_json: &str,
    ids_json: &str,
    start_date: &str,
    days: i32,
    min_duration_minutes: Option<i32>,
) -> Result<String, String> {
    let roster = parse_roster(roster_json)?;
    let team = roster
        .select(&parse_ids(ids_json)?)
        .map_err(|e| e.to_string())?;
    let horizon = Horizon::new(parse_date(start_date)?, i64::from(days)).map_err(|e| e.to_string())?;

    let min_duration = match min_duration_minutes {
        Some(m) if m <= 0 => {
            return Err(format!("minimum duration must be positive, got {}", m));
        }
        Some(m) => Duration::minutes(i64::from(m)),
        None => Duration::zero(),
    };

    let suggestion = match find_meeting_candidate(&team, &horizon, min_duration) {
        Ok(candidate) => candidate.start().map(|t| t.to_rfc3339()),
        Err(OverlapError::NoAvailableSlot { .. }) => None,
        Err(e) => return Err(e.to_string()),
    };
    to_json(&suggestion)
}

fn free_time_json(roster_json: &str, employee_id: EmployeeId, date: &str) -> Result<String, String> {
    let roster = parse_roster(roster_json)?;
    let record = roster
        .get(employee_id)
        .ok_or_else(|| OverlapError::MissingAvailabilityData(employee_id).to_string())?;

    let pieces = free_time(record, parse_date(date)?).map_err(|e| e.to_string())?;
    let dtos: Vec<FreeSlotDto> = pieces
        .into_iter()
        .map(FreeSlot::from)
        .map(|s| FreeSlotDto::from(&s))
        .collect();
    to_json(&dtos)
}

fn team_free_slots_json(
    roster_json: &str,
    ids_json: &str,
    date: &str,
    reference_timezone: &str,
) -> Result<String, String> {
    let roster = parse_roster(roster_json)?;
    let team = roster
        .select(&parse_ids(ids_json)?)
        .map_err(|e| e.to_string())?;
    let tz = parse_timezone(reference_timezone).map_err(|e| e.to_string())?;

    let slots = find_team_free_slots(&team, parse_date(date)?, &tz).map_err(|e| e.to_string())?;
    let dtos: Vec<FreeSlotDto> = slots.iter().map(FreeSlotDto::from).collect();
    to_json(&dtos)
}

fn team_free_overlap_json(
    roster_json: &str,
    ids_json: &str,
    start_date: &str,
    days: i32,
    reference_timezone: Option<&str>,
    dst_policy: Option<&str>,
) -> Result<String, String> {
    let roster = parse_roster(roster_json)?;
    let ids = parse_ids(ids_json)?;
    let horizon = Horizon::new(parse_date(start_date)?, i64::from(days)).map_err(|e| e.to_string())?;
    let tz = parse_timezone(reference_timezone.unwrap_or("UTC")).map_err(|e| e.to_string())?;

    let totals =
        team_free_overlap_with_policy(&roster, &ids, &horizon, &tz, parse_policy(dst_policy)?)
            .map_err(|e| e.to_string())?;

    let minutes: BTreeMap<String, i64> = totals
        .into_iter()
        .map(|(date, free)| (date.to_string(), free.num_minutes()))
        .collect();
    to_json(&minutes)
}

fn validate_meeting_time_json(
    roster_json: &str,
    ids_json: &str,
    instant: &str,
) -> Result<bool, String> {
    let roster = parse_roster(roster_json)?;
    let team = roster
        .select(&parse_ids(ids_json)?)
        .map_err(|e| e.to_string())?;
    let proposed = DateTime::parse_from_rfc3339(instant.trim())
        .map_err(|e| format!("Invalid instant '{}': {}", instant, e))?;

    is_valid_meeting_time(&team, &proposed).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Common working window of a set of employees on one date.
///
/// Returns a JSON array `[start, end]` of RFC 3339 strings, or `[]` when
/// there is no common window.
///
/// # Arguments
/// - `roster_json` -- JSON array of `{employee_id, timezone, work_start, work_end}`
/// - `employee_ids_json` -- JSON array of ids (e.g., "[1, 2]")
/// - `date` -- Calendar date (e.g., "2026-03-16")
/// - `dst_policy` -- Optional "wall_clock" | "shift_forward" | "skip"
#[wasm_bindgen(js_name = "computeOverlap")]
pub fn compute_overlap(
    roster_json: &str,
    employee_ids_json: &str,
    date: &str,
    dst_policy: Option<String>,
) -> Result<String, JsValue> {
    to_js(compute_overlap_json(
        roster_json,
        employee_ids_json,
        date,
        dst_policy.as_deref(),
    ))
}

/// Start of the first common window in `days` days from `start_date`.
///
/// Returns a JSON RFC 3339 string, or `null` when no day qualifies. With
/// `min_duration_minutes`, shorter windows are passed over.
#[wasm_bindgen(js_name = "suggestMeeting")]
pub fn suggest_meeting(
    roster_json: &str,
    employee_ids_json: &str,
    start_date: &str,
    days: i32,
    min_duration_minutes: Option<i32>,
) -> Result<String, JsValue> {
    to_js(suggest_meeting_json(
        roster_json,
        employee_ids_json,
        start_date,
        days,
        min_duration_minutes,
    ))
}

/// Free time of one employee on their local calendar day.
///
/// Returns a JSON array of `{start, end, duration_minutes}` objects.
#[wasm_bindgen(js_name = "freeTime")]
pub fn free_time_js(roster_json: &str, employee_id: u64, date: &str) -> Result<String, JsValue> {
    to_js(free_time_json(roster_json, employee_id, date))
}

/// Mutual free slots of a team during one day of `reference_timezone`.
#[wasm_bindgen(js_name = "teamFreeSlots")]
pub fn team_free_slots(
    roster_json: &str,
    employee_ids_json: &str,
    date: &str,
    reference_timezone: &str,
) -> Result<String, JsValue> {
    to_js(team_free_slots_json(
        roster_json,
        employee_ids_json,
        date,
        reference_timezone,
    ))
}

/// Mutual free minutes per day, keyed by `YYYY-MM-DD` in the reference zone
/// (UTC when omitted). Days with missing availability data are left out.
#[wasm_bindgen(js_name = "teamFreeOverlap")]
pub fn team_free_overlap(
    roster_json: &str,
    employee_ids_json: &str,
    start_date: &str,
    days: i32,
    reference_timezone: Option<String>,
    dst_policy: Option<String>,
) -> Result<String, JsValue> {
    to_js(team_free_overlap_json(
        roster_json,
        employee_ids_json,
        start_date,
        days,
        reference_timezone.as_deref(),
        dst_policy.as_deref(),
    ))
}

/// Whether an RFC 3339 instant falls inside the team's common window on the
/// instant's own calendar date.
#[wasm_bindgen(js_name = "validateMeetingTime")]
pub fn validate_meeting_time(
    roster_json: &str,
    employee_ids_json: &str,
    instant: &str,
) -> Result<bool, JsValue> {
    validate_meeting_time_json(roster_json, employee_ids_json, instant)
        .map_err(|e| JsValue::from_str(&e))
}
