//! DST transition policies for local working-window endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OverlapError;

/// Policy for a window endpoint whose wall-clock time does not exist on that
/// date (the spring-forward gap).
///
/// Ambiguous wall-clock times (the fall-back overlap) always resolve to the
/// earliest of the two instants, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Read the missing time with the offset in effect before the gap, so
    /// 02:30 in a 02:00-03:00 gap lands at 03:30.
    #[default]
    WallClock,
    /// Snap to the first valid instant after the gap (03:00 in the example).
    ShiftForward,
    /// Treat the employee as having no resolvable window on that date.
    Skip,
}

impl FromStr for DstPolicy {
    type Err = OverlapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "wall_clock" => Ok(DstPolicy::WallClock),
            "shift_forward" => Ok(DstPolicy::ShiftForward),
            "skip" => Ok(DstPolicy::Skip),
            other => Err(OverlapError::InvalidInput(format!(
                "unknown DST policy '{}' (expected wall_clock, shift_forward or skip)",
                other
            ))),
        }
    }
}

impl fmt::Display for DstPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DstPolicy::WallClock => write!(f, "wall_clock"),
            DstPolicy::ShiftForward => write!(f, "shift_forward"),
            DstPolicy::Skip => write!(f, "skip"),
        }
    }
}
