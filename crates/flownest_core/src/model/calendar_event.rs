//! Calendar event record, independent of tasks.

use super::{now_epoch_ms, require_text, OwnerId, Priority, RecordId, ValidationError};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub due_time: Option<NaiveTime>,
    pub priority: Priority,
    pub created_at: i64,
}

impl CalendarEvent {
    pub fn new(owner_id: OwnerId, title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            description: String::new(),
            due_date,
            due_time: None,
            priority: Priority::default(),
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }
}
