//! Free time: the complement of working windows.
//!
//! Per employee, free time is their local calendar day minus their working
//! window. Across a team, free time is the part of a reference-zone day in
//! which nobody is working: the day minus the merged union of every member's
//! windows, which is the same set as the intersection of their free pieces.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::dst::DstPolicy;
use crate::employee::{EmployeeAvailability, EmployeeId, Roster};
use crate::error::{OverlapError, Result};
use crate::horizon::Horizon;
use crate::interval::{self, AbsoluteInterval};
use crate::resolver;

/// A free time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl From<AbsoluteInterval> for FreeSlot {
    fn from(interval: AbsoluteInterval) -> Self {
        Self {
            start: interval.start(),
            end: interval.end(),
            duration_minutes: interval.duration_minutes(),
        }
    }
}

/// The gaps between busy periods within `window`.
///
/// Busy periods may overlap or extend past the window; they are clipped and
/// merged before the gaps are taken. Returns gaps sorted by start time.
pub fn free_slots_within(busy: &[AbsoluteInterval], window: &AbsoluteInterval) -> Vec<AbsoluteInterval> {
    if window.is_empty() {
        return Vec::new();
    }

    let clipped: Vec<AbsoluteInterval> = busy
        .iter()
        .map(|b| interval::intersect(b, window))
        .collect();
    let merged = interval::merge(&clipped);

    let mut free = Vec::new();
    let mut cursor = window.start();

    for busy in &merged {
        if cursor < busy.start() {
            free.push(AbsoluteInterval::normalized(cursor, busy.start()));
        }
        cursor = cursor.max(busy.end());
    }

    // Trailing gap after the last busy period.
    if cursor < window.end() {
        free.push(AbsoluteInterval::normalized(cursor, window.end()));
    }

    free
}

/// An employee's non-working time on their local calendar day `date`.
///
/// One piece when the window touches either end of the day, two when it is
/// strictly interior.
pub fn free_time(employee: &EmployeeAvailability, date: NaiveDate) -> Result<Vec<AbsoluteInterval>> {
    let tz = resolver::parse_timezone(&employee.timezone)?;
    let day = resolver::day_bounds(&tz, date)?;
    let window = resolver::resolve_window(employee, date)?;
    Ok(interval::subtract(&day, &window))
}

/// Total free time for an employee on their local day `date`.
pub fn free_hours(employee: &EmployeeAvailability, date: NaiveDate) -> Result<Duration> {
    let pieces = free_time(employee, date)?;
    Ok(interval::total_duration(&pieces))
}

/// Mutual free slots of `employees` during the `reference_tz` calendar day
/// `date`.
///
/// # Errors
/// `InvalidInput` when `employees` is empty, plus any resolution error.
pub fn find_team_free_slots(
    employees: &[EmployeeAvailability],
    date: NaiveDate,
    reference_tz: &Tz,
) -> Result<Vec<FreeSlot>> {
    if employees.is_empty() {
        return Err(OverlapError::InvalidInput(
            "team free time needs at least one employee".to_string(),
        ));
    }
    let slots = team_free_on(employees, date, reference_tz, DstPolicy::WallClock)?
        .unwrap_or_default();
    Ok(slots.into_iter().map(FreeSlot::from).collect())
}

/// Mutual free duration per reference-zone day across the horizon, under
/// [`DstPolicy::WallClock`].
pub fn team_free_overlap(
    roster: &Roster,
    ids: &[EmployeeId],
    horizon: &Horizon,
    reference_tz: &Tz,
) -> Result<BTreeMap<NaiveDate, Duration>> {
    team_free_overlap_with_policy(roster, ids, horizon, reference_tz, DstPolicy::WallClock)
}

/// Mutual free duration per reference-zone day across the horizon.
///
/// Days are keyed by their calendar date in `reference_tz`. A day is left out
/// of the mapping when any requested employee lacks availability data for it:
/// an id with no roster record excludes every day, and a window that cannot
/// be resolved under [`DstPolicy::Skip`] excludes the days it could touch.
///
/// # Errors
/// `InvalidInput` when `ids` is empty, plus any resolution error.
#[instrument(
    skip(roster, ids, reference_tz),
    fields(employees = ids.len(), start = %horizon.start(), days = horizon.days())
)]
pub fn team_free_overlap_with_policy(
    roster: &Roster,
    ids: &[EmployeeId],
    horizon: &Horizon,
    reference_tz: &Tz,
    policy: DstPolicy,
) -> Result<BTreeMap<NaiveDate, Duration>> {
    if ids.is_empty() {
        return Err(OverlapError::InvalidInput(
            "team free time needs at least one employee".to_string(),
        ));
    }

    let (employees, missing) = roster.partition(ids);
    if !missing.is_empty() {
        warn!(?missing, "no availability data; excluding every day of the horizon");
        return Ok(BTreeMap::new());
    }

    let mut totals = BTreeMap::new();
    for date in horizon.dates() {
        match team_free_on(&employees, date, reference_tz, policy)? {
            Some(slots) => {
                totals.insert(date, interval::total_duration(&slots));
            }
            None => debug!(%date, "day excluded: a working window could not be resolved"),
        }
    }

    Ok(totals)
}

/// `None` when some employee has an unresolvable window near `date`.
fn team_free_on(
    employees: &[EmployeeAvailability],
    date: NaiveDate,
    reference_tz: &Tz,
    policy: DstPolicy,
) -> Result<Option<Vec<AbsoluteInterval>>> {
    let day = resolver::day_bounds(reference_tz, date)?;

    // Windows from the neighbouring local dates can spill into the reference
    // day when the zones are far apart.
    let local_dates: Vec<NaiveDate> = [date.pred_opt(), Some(date), date.succ_opt()]
        .into_iter()
        .flatten()
        .collect();

    let mut busy = Vec::with_capacity(employees.len() * local_dates.len());
    for employee in employees {
        for local_date in &local_dates {
            match resolver::resolve_window_with_policy(employee, *local_date, policy)? {
                Some(window) => busy.push(window),
                None => return Ok(None),
            }
        }
    }

    Ok(Some(free_slots_within(&busy, &day)))
}
