//! Error types for overlap-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::employee::EmployeeId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlapError {
    /// Empty employee set, non-positive horizon, malformed interval or window.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimeZone(String),

    /// The search scanned every day of its horizon without finding a
    /// positive-duration overlap.
    #[error("No available slot in {days} day(s) starting {start_date}")]
    NoAvailableSlot { start_date: NaiveDate, days: i64 },

    #[error("No availability data for employee {0}")]
    MissingAvailabilityData(EmployeeId),
}

pub type Result<T> = std::result::Result<T, OverlapError>;
