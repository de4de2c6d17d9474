//! Domain records for the dashboard collections.
//!
//! # Responsibility
//! - Define one plain record type per collection (tasks, habits, goals,
//!   reflections, calendar events, time blocks).
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - Every record carries exactly one `owner_id`.
//! - Deletion is a hard delete; there is no tombstone state.

use chrono::{NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod calendar_event;
pub mod goal;
pub mod habit;
pub mod reflection;
pub mod task;
pub mod time_block;

/// Identifier of the account that owns a record.
pub type OwnerId = Uuid;

/// Stable identifier of one stored record.
pub type RecordId = Uuid;

/// Owner used when nobody is signed in.
pub const GUEST_OWNER_ID: OwnerId = Uuid::nil();

static CLOCK_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$").expect("valid clock time regex"));

/// Field-level validation failure for any record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    EmptyField(&'static str),
    /// A numeric field is NaN or infinite.
    NonFiniteNumber(&'static str),
    /// Habit day index outside `0..7`.
    DayIndexOutOfRange(usize),
    /// Time string is not `HH:MM`.
    InvalidClockTime(String),
    /// Time range ends at or before its start.
    EmptyTimeRange { start: NaiveTime, end: NaiveTime },
    /// Unknown enum literal.
    UnknownValue { field: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` cannot be empty"),
            Self::NonFiniteNumber(field) => write!(f, "`{field}` must be a finite number"),
            Self::DayIndexOutOfRange(index) => {
                write!(f, "day index {index} is outside the week (0..7)")
            }
            Self::InvalidClockTime(value) => {
                write!(f, "invalid time `{value}`; expected HH:MM")
            }
            Self::EmptyTimeRange { start, end } => write!(
                f,
                "end time {} must be after start time {}",
                end.format("%H:%M"),
                start.format("%H:%M")
            ),
            Self::UnknownValue { field, value } => {
                write!(f, "unknown {field} `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// Task/event priority. Maps to a client-side sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort key used for list ordering: high=1, medium=2, low=3.
    pub fn sort_key(self) -> i64 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(ValidationError::UnknownValue {
                field: "priority",
                value: other.to_string(),
            }),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current wall clock in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parses a 24-hour `HH:MM` (or `H:MM`) clock string.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = value.trim();
    let caps = CLOCK_TIME_RE
        .captures(trimmed)
        .ok_or_else(|| ValidationError::InvalidClockTime(trimmed.to_string()))?;
    let hour = caps[1]
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidClockTime(trimmed.to_string()))?;
    let minute = caps[2]
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidClockTime(trimmed.to_string()))?;
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| ValidationError::InvalidClockTime(trimmed.to_string()))
}

/// Formats a clock time as `H:MM AM|PM`.
pub fn format_clock_12h(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_clock_12h, parse_clock_time, Priority, ValidationError};
    use chrono::NaiveTime;

    #[test]
    fn priority_sort_keys_follow_urgency() {
        assert_eq!(Priority::High.sort_key(), 1);
        assert_eq!(Priority::Medium.sort_key(), 2);
        assert_eq!(Priority::Low.sort_key(), 3);
        assert_eq!(Priority::parse(" HIGH ").unwrap(), Priority::High);
        assert!(Priority::parse("urgent").is_err());
    }

    #[test]
    fn clock_time_accepts_short_hours_and_rejects_garbage() {
        assert_eq!(
            parse_clock_time("9:05").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 0).unwrap()
        );
        assert_eq!(
            parse_clock_time("23:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
        assert!(matches!(
            parse_clock_time("24:00"),
            Err(ValidationError::InvalidClockTime(_))
        ));
        assert!(parse_clock_time("noon").is_err());
    }

    #[test]
    fn twelve_hour_format_matches_dashboard_display() {
        assert_eq!(format_clock_12h(NaiveTime::from_hms_opt(0, 30, 0).unwrap()), "12:30 AM");
        assert_eq!(format_clock_12h(NaiveTime::from_hms_opt(13, 5, 0).unwrap()), "1:05 PM");
        assert_eq!(format_clock_12h(NaiveTime::from_hms_opt(12, 0, 0).unwrap()), "12:00 PM");
    }
}
