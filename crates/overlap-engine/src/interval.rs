//! Primitive operations on absolute (UTC) time intervals.
//!
//! Every interval is half-open, `[start, end)`. Two intervals that merely touch
//! (`a.end == b.start`) share no instant, so their intersection is empty.
//!
//! Empty results are normalized to a single canonical value,
//! [`AbsoluteInterval::empty`], so callers can compare against it directly.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{OverlapError, Result};

/// A half-open range `[start, end)` on the UTC timeline.
///
/// The constructor and deserialization both reject `start > end`, so every
/// value in circulation is well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct AbsoluteInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for AbsoluteInterval {
    type Error = OverlapError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        AbsoluteInterval::new(raw.start, raw.end)
    }
}

impl AbsoluteInterval {
    /// Build an interval, failing with `InvalidInput` when `start > end`.
    ///
    /// A zero-length input is normalized to the canonical empty interval.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(OverlapError::InvalidInput(format!(
                "interval start {} is after end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self::normalized(start, end))
    }

    /// The canonical empty interval, anchored at the Unix epoch.
    pub fn empty() -> Self {
        Self {
            start: DateTime::<Utc>::UNIX_EPOCH,
            end: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Build from bounds known to be ordered, collapsing zero length to the
    /// canonical empty interval.
    pub(crate) fn normalized(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if start >= end {
            Self::empty()
        } else {
            Self { start, end }
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn duration(&self) -> Duration {
        duration(self)
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True when `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// True when the two intervals share at least one instant.
    pub fn overlaps(&self, other: &AbsoluteInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Intersection of two intervals: `[max(a.start, b.start), min(a.end, b.end))`.
///
/// Disjoint or merely adjacent inputs yield [`AbsoluteInterval::empty`].
pub fn intersect(a: &AbsoluteInterval, b: &AbsoluteInterval) -> AbsoluteInterval {
    AbsoluteInterval::normalized(a.start.max(b.start), a.end.min(b.end))
}

/// Left fold of [`intersect`] over the sequence.
///
/// # Errors
/// `InvalidInput` when `intervals` is empty; the intersection of zero sets is
/// undefined here rather than "everything".
pub fn intersect_all(intervals: &[AbsoluteInterval]) -> Result<AbsoluteInterval> {
    let (first, rest) = intervals.split_first().ok_or_else(|| {
        OverlapError::InvalidInput("cannot intersect an empty set of intervals".to_string())
    })?;

    Ok(rest.iter().fold(*first, |acc, next| intersect(&acc, next)))
}

/// The parts of `a` outside `b`: zero, one or two disjoint, non-empty pieces in
/// chronological order.
pub fn subtract(a: &AbsoluteInterval, b: &AbsoluteInterval) -> Vec<AbsoluteInterval> {
    if a.is_empty() {
        return Vec::new();
    }
    if b.is_empty() || !a.overlaps(b) {
        return vec![*a];
    }

    let before = AbsoluteInterval::normalized(a.start, a.end.min(b.start));
    let after = AbsoluteInterval::normalized(a.start.max(b.end), a.end);

    [before, after]
        .into_iter()
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Length of the interval; zero for the empty interval.
pub fn duration(a: &AbsoluteInterval) -> Duration {
    if a.is_empty() {
        Duration::zero()
    } else {
        a.end - a.start
    }
}

/// Sort and coalesce overlapping or adjacent intervals, dropping empty ones.
///
/// Returns a sorted list in which no two intervals overlap or touch.
pub fn merge(intervals: &[AbsoluteInterval]) -> Vec<AbsoluteInterval> {
    let mut sorted: Vec<AbsoluteInterval> = intervals
        .iter()
        .filter(|i| !i.is_empty())
        .copied()
        .collect();

    sorted.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<AbsoluteInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

/// Total length of a set of intervals, counting shared time once.
pub fn total_duration(intervals: &[AbsoluteInterval]) -> Duration {
    merge(intervals)
        .iter()
        .fold(Duration::zero(), |acc, i| acc + i.duration())
}
