//! Intersect the working windows of N employees on one calendar date.
//!
//! Each employee's window is resolved in their own timezone for the same
//! nominal date, then the absolute intervals are intersected. An empty result
//! is a legitimate answer ("no common time that day") and is kept distinct
//! from the case where some participant has no window at all.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::dst::DstPolicy;
use crate::employee::{EmployeeAvailability, EmployeeId};
use crate::error::{OverlapError, Result};
use crate::interval::{self, AbsoluteInterval};
use crate::resolver;

/// Mutual working time of an employee set on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlapResult {
    /// The intersection of every participant's window. May be
    /// [`AbsoluteInterval::empty`].
    Window(AbsoluteInterval),
    /// These participants had no resolvable window on the date.
    NoData { missing: Vec<EmployeeId> },
}

impl OverlapResult {
    pub fn window(&self) -> Option<&AbsoluteInterval> {
        match self {
            OverlapResult::Window(w) => Some(w),
            OverlapResult::NoData { .. } => None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.window().map(AbsoluteInterval::duration).unwrap_or_else(Duration::zero)
    }

    /// True when there is a positive-duration window to meet in.
    pub fn is_usable(&self) -> bool {
        self.duration() > Duration::zero()
    }

    /// Flattened `[start, end]` boundary list; empty when there is no mutual time.
    pub fn boundaries(&self) -> Vec<DateTime<Utc>> {
        match self.window() {
            Some(w) if !w.is_empty() => vec![w.start(), w.end()],
            _ => Vec::new(),
        }
    }
}

/// Compute the overlap of `employees` on `date` under [`DstPolicy::WallClock`].
///
/// # Errors
/// `InvalidInput` when `employees` is empty or a window is malformed;
/// `UnknownTimeZone` when a record names an unknown zone.
pub fn overlap(employees: &[EmployeeAvailability], date: NaiveDate) -> Result<OverlapResult> {
    overlap_with_policy(employees, date, DstPolicy::WallClock)
}

/// Compute the overlap of `employees` on `date` with an explicit DST policy.
#[instrument(skip(employees), fields(participants = employees.len()))]
pub fn overlap_with_policy(
    employees: &[EmployeeAvailability],
    date: NaiveDate,
    policy: DstPolicy,
) -> Result<OverlapResult> {
    if employees.is_empty() {
        return Err(OverlapError::InvalidInput(
            "overlap is undefined for an empty employee set".to_string(),
        ));
    }

    let mut windows = Vec::with_capacity(employees.len());
    let mut missing = Vec::new();
    for employee in employees {
        match resolver::resolve_window_with_policy(employee, date, policy)? {
            Some(window) => windows.push(window),
            None => missing.push(employee.employee_id),
        }
    }

    if !missing.is_empty() {
        debug!(?missing, "participants without a window");
        return Ok(OverlapResult::NoData { missing });
    }

    let common = interval::intersect_all(&windows)?;
    debug!(
        minutes = common.duration_minutes(),
        "computed common working window"
    );
    Ok(OverlapResult::Window(common))
}
