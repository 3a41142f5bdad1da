//! Employee working-hours snapshots and the roster they are looked up from.
//!
//! The engine never fetches records itself. Callers load a [`Roster`] (or build
//! `EmployeeAvailability` values directly) and hand the snapshots in.

use std::collections::HashMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{OverlapError, Result};

/// Numeric employee identifier, as issued by the employee directory.
pub type EmployeeId = u64;

/// One employee's timezone and local daily working window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeAvailability {
    pub employee_id: EmployeeId,
    /// IANA timezone identifier (e.g., "Asia/Kolkata"). Resolved when used, so
    /// an unknown name surfaces as `UnknownTimeZone` at computation time.
    pub timezone: String,
    #[serde(with = "time_of_day")]
    pub work_start: NaiveTime,
    #[serde(with = "time_of_day")]
    pub work_end: NaiveTime,
}

impl EmployeeAvailability {
    pub fn new(
        employee_id: EmployeeId,
        timezone: impl Into<String>,
        work_start: NaiveTime,
        work_end: NaiveTime,
    ) -> Self {
        Self {
            employee_id,
            timezone: timezone.into(),
            work_start,
            work_end,
        }
    }

    /// Reject windows that are empty or wrap past midnight.
    pub fn validate_window(&self) -> Result<()> {
        if self.work_start >= self.work_end {
            return Err(OverlapError::InvalidInput(format!(
                "employee {}: working window {}-{} must start before it ends on the same day",
                self.employee_id, self.work_start, self.work_end
            )));
        }
        Ok(())
    }
}

/// Snapshot of availability records keyed by employee id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: HashMap<EmployeeId, EmployeeAvailability>,
}

impl Roster {
    /// Build a roster from records. A later record for the same id replaces an
    /// earlier one.
    pub fn new(records: impl IntoIterator<Item = EmployeeAvailability>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.employee_id, r))
                .collect(),
        }
    }

    /// Parse a JSON array of availability records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<EmployeeAvailability> = serde_json::from_str(json)
            .map_err(|e| OverlapError::InvalidInput(format!("invalid roster JSON: {}", e)))?;
        Ok(Self::new(records))
    }

    pub fn get(&self, id: EmployeeId) -> Option<&EmployeeAvailability> {
        self.records.get(&id)
    }

    /// Look up every id in request order.
    ///
    /// # Errors
    /// `MissingAvailabilityData` for the first id with no record.
    pub fn select(&self, ids: &[EmployeeId]) -> Result<Vec<EmployeeAvailability>> {
        ids.iter()
            .map(|id| {
                self.get(*id)
                    .cloned()
                    .ok_or(OverlapError::MissingAvailabilityData(*id))
            })
            .collect()
    }

    /// Split `ids` into the records that exist and the ids that have none.
    pub fn partition(&self, ids: &[EmployeeId]) -> (Vec<EmployeeAvailability>, Vec<EmployeeId>) {
        let mut found = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for id in ids {
            match self.get(*id) {
                Some(record) => found.push(record.clone()),
                None => missing.push(*id),
            }
        }
        (found, missing)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Serialize a `NaiveTime` as `HH:MM` (or `HH:MM:SS` when seconds are set);
/// accept either form when deserializing.
pub mod time_of_day {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = if value.second() == 0 {
            value.format("%H:%M").to_string()
        } else {
            value.format("%H:%M:%S").to_string()
        };
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse `HH:MM` or `HH:MM:SS`.
    pub fn parse(raw: &str) -> Result<NaiveTime, String> {
        let trimmed = raw.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .map_err(|e| format!("invalid time of day '{}': {}", raw, e))
    }
}
