//! Meeting search over a bounded run of days, and validation of one instant.
//!
//! The search ranks candidate days by date alone: the earliest day with a
//! usable overlap wins, even if a later day offers a longer window.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::employee::EmployeeAvailability;
use crate::error::{OverlapError, Result};
use crate::horizon::Horizon;
use crate::overlap::{self, OverlapResult};

/// One day of a meeting search and the overlap computed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingCandidate {
    pub date: NaiveDate,
    pub overlap: OverlapResult,
}

impl MeetingCandidate {
    /// Start of the common window, if there is one with positive duration.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.overlap
            .window()
            .filter(|_| self.overlap.is_usable())
            .map(|w| w.start())
    }
}

/// Suggest the start of the first usable common window in
/// `start_date .. start_date + days_to_check`.
///
/// # Errors
/// `InvalidInput` for an empty employee set or `days_to_check < 1`;
/// `NoAvailableSlot` when no day in the horizon has positive overlap.
pub fn suggest_meeting(
    employees: &[EmployeeAvailability],
    start_date: NaiveDate,
    days_to_check: i64,
) -> Result<DateTime<Utc>> {
    let horizon = Horizon::new(start_date, days_to_check)?;
    let candidate = find_meeting_candidate(employees, &horizon, Duration::zero())?;
    candidate
        .start()
        .ok_or_else(|| no_slot(&horizon))
}

/// The first candidate in the horizon whose overlap is positive and at least
/// `min_duration` long.
///
/// # Errors
/// As [`suggest_meeting`].
#[instrument(
    skip(employees),
    fields(participants = employees.len(), start = %horizon.start(), days = horizon.days())
)]
pub fn find_meeting_candidate(
    employees: &[EmployeeAvailability],
    horizon: &Horizon,
    min_duration: Duration,
) -> Result<MeetingCandidate> {
    if employees.is_empty() {
        return Err(OverlapError::InvalidInput(
            "meeting search needs at least one employee".to_string(),
        ));
    }

    for date in horizon.dates() {
        let result = overlap::overlap(employees, date)?;
        if result.is_usable() && result.duration() >= min_duration {
            debug!(%date, minutes = result.duration().num_minutes(), "found meeting day");
            return Ok(MeetingCandidate {
                date,
                overlap: result,
            });
        }
    }

    Err(no_slot(horizon))
}

/// One candidate per date of the horizon, in date order, usable or not.
pub fn meeting_candidates(
    employees: &[EmployeeAvailability],
    horizon: &Horizon,
) -> Result<Vec<MeetingCandidate>> {
    horizon
        .dates()
        .map(|date| {
            overlap::overlap(employees, date).map(|overlap| MeetingCandidate { date, overlap })
        })
        .collect()
}

/// Whether `proposed` falls inside the common working window of `employees`.
///
/// The date checked is the calendar date of `proposed` in its own offset, i.e.
/// the zone the caller expressed the instant in. Returns `false` when the
/// overlap is empty or some participant has no window.
///
/// # Errors
/// Only for bad employee data: `InvalidInput` for an empty set or malformed
/// window, `UnknownTimeZone` for an unknown zone.
pub fn is_valid_meeting_time<Z: TimeZone>(
    employees: &[EmployeeAvailability],
    proposed: &DateTime<Z>,
) -> Result<bool> {
    let date = proposed.date_naive();
    let instant = proposed.with_timezone(&Utc);

    let valid = match overlap::overlap(employees, date)? {
        OverlapResult::Window(window) => window.contains(instant),
        OverlapResult::NoData { .. } => false,
    };

    debug!(%date, %instant, valid, "validated meeting time");
    Ok(valid)
}

fn no_slot(horizon: &Horizon) -> OverlapError {
    OverlapError::NoAvailableSlot {
        start_date: horizon.start(),
        days: i64::from(horizon.days()),
    }
}
