//! # overlap-engine
//!
//! Cross-timezone working-hours availability for distributed teams.
//!
//! Given each employee's IANA timezone and local working window, the engine
//! works out when a group is simultaneously at work, how much free time they
//! share, and which day to put a meeting on. Every operation is a pure
//! function of the snapshots passed in: no I/O, no shared state. DST is
//! handled per date via `chrono-tz`.
//!
//! ## Modules
//!
//! - [`interval`]: Half-open UTC interval algebra (intersect, subtract, merge)
//! - [`dst`]: Policies for local times that fall in a DST gap
//! - [`employee`]: Availability snapshots and the roster they come from
//! - [`resolver`]: Local working window + date → absolute interval
//! - [`horizon`]: Bounded runs of consecutive dates
//! - [`overlap`]: Common working window of N employees on a date
//! - [`freebusy`]: Per-employee and team free time
//! - [`meeting`]: Meeting day search and instant validation
//! - [`error`]: Error types

pub mod dst;
pub mod employee;
pub mod error;
pub mod freebusy;
pub mod horizon;
pub mod interval;
pub mod meeting;
pub mod overlap;
pub mod resolver;

pub use dst::DstPolicy;
pub use employee::{EmployeeAvailability, EmployeeId, Roster};
pub use error::OverlapError;
pub use freebusy::{find_team_free_slots, free_hours, free_time, team_free_overlap, FreeSlot};
pub use horizon::Horizon;
pub use interval::{intersect, intersect_all, subtract, AbsoluteInterval};
pub use meeting::{is_valid_meeting_time, suggest_meeting, MeetingCandidate};
pub use overlap::{overlap, OverlapResult};
pub use resolver::{parse_timezone, resolve_window};
