//! `tzo` CLI: working-hours overlap, free time and meeting search from the
//! command line.
//!
//! The roster is a JSON array of availability records:
//!
//! ```json
//! [{"employee_id": 1, "timezone": "Europe/Paris", "work_start": "09:00", "work_end": "17:00"}]
//! ```
//!
//! ## Usage
//!
//! ```sh
//! # Common working window of employees 1 and 2 on a date
//! tzo -r roster.json overlap --employees 1,2 --date 2026-03-16
//!
//! # First usable meeting start over the next 5 days (roster on stdin)
//! cat roster.json | tzo suggest-meeting --employees 1,2 --start-date 2026-03-16
//!
//! # Free time for one employee on a date
//! tzo -r roster.json free-hours --employee 1 --date 2026-03-16
//!
//! # Mutual free minutes per day across a team
//! tzo -r roster.json team-free-hours-overlap --employees 1,2,3 --days 7
//!
//! # Check a proposed meeting time
//! tzo -r roster.json validate-meeting-time --employees 1,2 --time 2026-03-16T09:30:00+01:00
//! ```

mod config;

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use clap::{ArgAction, Parser, Subcommand};
use overlap_engine::freebusy::team_free_overlap_with_policy;
use overlap_engine::meeting::find_meeting_candidate;
use overlap_engine::overlap::overlap_with_policy;
use overlap_engine::{
    free_hours, free_time, is_valid_meeting_time, parse_timezone, EmployeeId, FreeSlot, Horizon,
    OverlapError, Roster,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, Config};

#[derive(Parser)]
#[command(
    name = "tzo",
    version,
    about = "Cross-timezone working-hours overlap and meeting search"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Roster JSON file (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    roster: Option<String>,

    /// Config file (defaults to $TZO_CONFIG, then the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Common working window of a set of employees on one date
    Overlap {
        /// Comma-separated employee ids
        #[arg(long, value_delimiter = ',', required = true)]
        employees: Vec<EmployeeId>,
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Start of the first usable common window within a run of days
    SuggestMeeting {
        /// Comma-separated employee ids
        #[arg(long, value_delimiter = ',', required = true)]
        employees: Vec<EmployeeId>,
        /// First date to check (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,
        /// Number of days to check (defaults to the configured horizon)
        #[arg(long, allow_hyphen_values = true)]
        days: Option<i64>,
        /// Only accept windows at least this many minutes long
        #[arg(long)]
        min_duration: Option<i64>,
    },
    /// Free time of one employee on their local calendar day
    FreeHours {
        #[arg(long)]
        employee: EmployeeId,
        /// Calendar date (YYYY-MM-DD, defaults to today in UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Mutual free minutes per reference-timezone day across a team
    TeamFreeHoursOverlap {
        /// Comma-separated employee ids
        #[arg(long, value_delimiter = ',', required = true)]
        employees: Vec<EmployeeId>,
        /// First date (YYYY-MM-DD, defaults to today in UTC)
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Number of days (defaults to the configured horizon)
        #[arg(long, allow_hyphen_values = true)]
        days: Option<i64>,
    },
    /// Whether a proposed instant falls inside the team's common window
    ValidateMeetingTime {
        /// Comma-separated employee ids
        #[arg(long, value_delimiter = ',', required = true)]
        employees: Vec<EmployeeId>,
        /// Proposed meeting time with offset (RFC 3339)
        #[arg(long)]
        time: DateTime<FixedOffset>,
    },
}

#[derive(Serialize)]
struct FreeHoursReport {
    employee_id: EmployeeId,
    date: NaiveDate,
    duration_minutes: i64,
    free: Vec<FreeSlot>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(cli.verbose, &config.log_level);
    debug!(?config, "loaded configuration");

    let roster_json = read_input(cli.roster.as_deref())?;
    let roster = Roster::from_json(&roster_json).context("Failed to load roster")?;
    debug!(records = roster.len(), "loaded roster");

    run(cli.command, &roster, &config)
}

fn run(command: Commands, roster: &Roster, config: &Config) -> Result<()> {
    match command {
        Commands::Overlap { employees, date } => {
            let team = roster.select(&employees)?;
            let result = overlap_with_policy(&team, date, config.dst_policy)
                .context("Failed to compute overlap")?;
            print_json(&result.boundaries())
        }
        Commands::SuggestMeeting {
            employees,
            start_date,
            days,
            min_duration,
        } => {
            let team = roster.select(&employees)?;
            let days = days.unwrap_or(config.default_days);

            let outcome = match min_duration {
                Some(minutes) if minutes <= 0 => {
                    bail!("--min-duration must be a positive number of minutes, got {}", minutes)
                }
                Some(minutes) => Horizon::new(start_date, days).and_then(|horizon| {
                    find_meeting_candidate(&team, &horizon, Duration::minutes(minutes))
                        .map(|candidate| candidate.start())
                }),
                None => overlap_engine::suggest_meeting(&team, start_date, days).map(Some),
            };

            let suggestion: Option<DateTime<Utc>> = match outcome {
                Ok(start) => start,
                // Not an error for the caller: there is simply nothing to suggest.
                Err(OverlapError::NoAvailableSlot { .. }) => None,
                Err(e) => return Err(e).context("Failed to search for a meeting slot"),
            };
            print_json(&suggestion)
        }
        Commands::FreeHours { employee, date } => {
            let record = roster
                .get(employee)
                .ok_or(OverlapError::MissingAvailabilityData(employee))?;
            let date = date.unwrap_or_else(|| Utc::now().date_naive());

            let total = free_hours(record, date).context("Failed to compute free hours")?;
            let pieces = free_time(record, date).context("Failed to compute free time")?;
            let report = FreeHoursReport {
                employee_id: employee,
                date,
                duration_minutes: total.num_minutes(),
                free: pieces.into_iter().map(FreeSlot::from).collect(),
            };
            print_json(&report)
        }
        Commands::TeamFreeHoursOverlap {
            employees,
            start_date,
            days,
        } => {
            let start_date = start_date.unwrap_or_else(|| Utc::now().date_naive());
            let horizon = Horizon::new(start_date, days.unwrap_or(config.default_days))?;
            let reference_tz = parse_timezone(&config.reference_timezone)
                .context("Invalid reference_timezone in config")?;

            let totals = team_free_overlap_with_policy(
                roster,
                &employees,
                &horizon,
                &reference_tz,
                config.dst_policy,
            )
            .context("Failed to compute team free time")?;

            let minutes: BTreeMap<NaiveDate, i64> = totals
                .into_iter()
                .map(|(date, free)| (date, free.num_minutes()))
                .collect();
            print_json(&minutes)
        }
        Commands::ValidateMeetingTime { employees, time } => {
            let team = roster.select(&employees)?;
            let valid = is_valid_meeting_time(&team, &time)
                .context("Failed to validate meeting time")?;
            print_json(&valid)
        }
    }
}

/// Log to stderr so stdout stays machine-readable.
fn init_logging(verbose: u8, configured_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => configured_level,
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(level)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
