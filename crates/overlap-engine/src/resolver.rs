//! Local working window + calendar date → absolute UTC interval.
//!
//! Offsets are looked up for the specific instant being converted, never
//! cached per zone, so every date gets the offset actually in effect. The two
//! endpoints of a window are converted independently: a window that straddles
//! a DST transition comes out an hour longer or shorter than its nominal
//! local length.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use tracing::debug;

use crate::dst::DstPolicy;
use crate::employee::EmployeeAvailability;
use crate::error::{OverlapError, Result};
use crate::interval::AbsoluteInterval;

/// Parse an IANA timezone identifier.
///
/// # Errors
/// Returns `OverlapError::UnknownTimeZone` if `name` is not a known zone.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| OverlapError::UnknownTimeZone(name.to_string()))
}

/// Resolve an employee's working window on `date` under [`DstPolicy::WallClock`].
///
/// # Errors
/// `UnknownTimeZone` for an unresolvable zone, `InvalidInput` for a window that
/// does not start before it ends.
pub fn resolve_window(employee: &EmployeeAvailability, date: NaiveDate) -> Result<AbsoluteInterval> {
    let window = resolve_window_with_policy(employee, date, DstPolicy::WallClock)?;
    // WallClock maps every local time to an instant.
    Ok(window.unwrap_or_else(AbsoluteInterval::empty))
}

/// Resolve an employee's working window on `date` with an explicit DST policy.
///
/// Returns `Ok(None)` only under [`DstPolicy::Skip`], when an endpoint falls in
/// a spring-forward gap.
pub fn resolve_window_with_policy(
    employee: &EmployeeAvailability,
    date: NaiveDate,
    policy: DstPolicy,
) -> Result<Option<AbsoluteInterval>> {
    employee.validate_window()?;
    let tz = parse_timezone(&employee.timezone)?;

    let start = local_to_utc(&tz, date.and_time(employee.work_start), policy);
    let end = local_to_utc(&tz, date.and_time(employee.work_end), policy);

    match (start, end) {
        (Some(start), Some(end)) => {
            // A start pushed forward out of a gap can pass an end that sits just
            // after the gap; the window is then empty, not malformed.
            AbsoluteInterval::new(start, end.max(start)).map(Some)
        }
        _ => {
            debug!(
                employee_id = employee.employee_id,
                %date,
                timezone = %employee.timezone,
                "working window skipped: endpoint falls in a DST gap"
            );
            Ok(None)
        }
    }
}

/// The local calendar day `date` in `tz`, as an absolute interval.
///
/// Runs from the first instant of `date` to the first instant of the next
/// day, so it is 23 or 25 hours long on transition days. A midnight that does
/// not exist snaps forward to the end of the gap.
pub fn day_bounds(tz: &Tz, date: NaiveDate) -> Result<AbsoluteInterval> {
    let next = date
        .succ_opt()
        .ok_or_else(|| OverlapError::InvalidInput(format!("date {} has no successor", date)))?;

    let start = first_instant_of(tz, date);
    let end = first_instant_of(tz, next);
    AbsoluteInterval::new(start, end)
}

fn first_instant_of(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match local_to_utc(tz, midnight, DstPolicy::ShiftForward) {
        Some(instant) => instant,
        // ShiftForward always yields an instant; read as UTC to stay total.
        None => midnight.and_utc(),
    }
}

/// Map a local wall-clock time in `tz` to a UTC instant.
///
/// Ambiguous times resolve to the earliest instant. Times inside a gap follow
/// `policy`; `None` is returned only for [`DstPolicy::Skip`].
pub fn local_to_utc(tz: &Tz, local: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => resolve_gap(tz, local, policy),
    }
}

fn resolve_gap(tz: &Tz, local: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Utc>> {
    // Real zones never transition twice within a day of each other, so the
    // offsets one day either side are the ones bracketing the gap.
    let before = offset_seconds_at(tz, local - Duration::days(1));
    let after = offset_seconds_at(tz, local + Duration::days(1));

    let read_with_before = (local - Duration::seconds(before)).and_utc();
    let read_with_after = (local - Duration::seconds(after)).and_utc();

    match policy {
        DstPolicy::WallClock => Some(read_with_before),
        DstPolicy::ShiftForward => Some(transition_between(tz, read_with_after, read_with_before)),
        DstPolicy::Skip => None,
    }
}

fn offset_seconds_at(tz: &Tz, utc: NaiveDateTime) -> i64 {
    i64::from(tz.offset_from_utc_datetime(&utc).fix().local_minus_utc())
}

/// Binary search, to the second, for the first instant in `(lo, hi]` that
/// carries the offset in effect at `hi`.
fn transition_between(tz: &Tz, lo: DateTime<Utc>, hi: DateTime<Utc>) -> DateTime<Utc> {
    let target = offset_seconds_at(tz, hi.naive_utc());
    let (mut lo_secs, mut hi_secs) = (lo.timestamp(), hi.timestamp());

    while hi_secs - lo_secs > 1 {
        let mid = lo_secs + (hi_secs - lo_secs) / 2;
        let mid_offset = DateTime::from_timestamp(mid, 0)
            .map(|dt| offset_seconds_at(tz, dt.naive_utc()))
            .unwrap_or(target);
        if mid_offset == target {
            hi_secs = mid;
        } else {
            lo_secs = mid;
        }
    }

    DateTime::from_timestamp(hi_secs, 0).unwrap_or(hi)
}
