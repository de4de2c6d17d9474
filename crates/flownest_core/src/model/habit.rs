//! Habit record with a fixed seven-slot week.
//!
//! Slot 0 is Monday, slot 6 is Sunday.

use super::{now_epoch_ms, require_text, OwnerId, RecordId, ValidationError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DAYS_PER_WEEK: usize = 7;

/// Short labels for the week slots.
pub const DAY_LABELS: [&str; DAYS_PER_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub name: String,
    pub days: [bool; DAYS_PER_WEEK],
    pub created_at: i64,
}

impl Habit {
    /// Creates a habit with every day unchecked.
    pub fn new(owner_id: OwnerId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            days: [false; DAYS_PER_WEEK],
            created_at: now_epoch_ms(),
        }
    }

    /// Flips exactly one day slot.
    pub fn toggle_day(&mut self, day_index: usize) -> Result<bool, ValidationError> {
        let slot = self
            .days
            .get_mut(day_index)
            .ok_or(ValidationError::DayIndexOutOfRange(day_index))?;
        *slot = !*slot;
        Ok(*slot)
    }

    pub fn completed_days(&self) -> usize {
        self.days.iter().filter(|done| **done).count()
    }

    /// Whether the slot matching `date`'s weekday is checked.
    pub fn is_checked_on(&self, date: NaiveDate) -> bool {
        self.days[weekday_index(date)]
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

/// Week slot for a calendar date (Monday = 0).
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Encodes the week as a `0/1` string for storage.
pub(crate) fn encode_days(days: &[bool; DAYS_PER_WEEK]) -> String {
    days.iter().map(|done| if *done { '1' } else { '0' }).collect()
}

pub(crate) fn decode_days(value: &str) -> Option<[bool; DAYS_PER_WEEK]> {
    if value.chars().count() != DAYS_PER_WEEK {
        return None;
    }
    let mut days = [false; DAYS_PER_WEEK];
    for (slot, ch) in days.iter_mut().zip(value.chars()) {
        *slot = match ch {
            '0' => false,
            '1' => true,
            _ => return None,
        };
    }
    Some(days)
}
