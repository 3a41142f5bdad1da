//! A bounded run of consecutive calendar dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{OverlapError, Result};

/// Longest horizon accepted, about five years of dates.
pub const MAX_HORIZON_DAYS: i64 = 366 * 5;

/// `days` consecutive dates beginning at `start`.
///
/// Deserialization goes through [`Horizon::new`], so a decoded horizon obeys
/// the same bounds as a constructed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHorizon")]
pub struct Horizon {
    start: NaiveDate,
    days: u32,
}

#[derive(Deserialize)]
struct RawHorizon {
    start: NaiveDate,
    days: i64,
}

impl TryFrom<RawHorizon> for Horizon {
    type Error = OverlapError;

    fn try_from(raw: RawHorizon) -> Result<Self> {
        Horizon::new(raw.start, raw.days)
    }
}

impl Horizon {
    /// # Errors
    /// `InvalidInput` when `days` is zero, negative or above
    /// [`MAX_HORIZON_DAYS`].
    pub fn new(start: NaiveDate, days: i64) -> Result<Self> {
        if days < 1 {
            return Err(OverlapError::InvalidInput(format!(
                "horizon must cover at least one day, got {}",
                days
            )));
        }
        if days > MAX_HORIZON_DAYS {
            return Err(OverlapError::InvalidInput(format!(
                "horizon of {} days is too long (at most {})",
                days, MAX_HORIZON_DAYS
            )));
        }
        let days = u32::try_from(days).map_err(|_| {
            OverlapError::InvalidInput(format!("horizon of {} days is too long", days))
        })?;
        Ok(Self { start, days })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// `start, start + 1, …, start + days - 1`, in order. Stops early only at
    /// the end of the representable calendar.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.days as usize)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && (date - self.start).num_days() < i64::from(self.days)
    }
}
