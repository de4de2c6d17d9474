//! Task record.
//!
//! # Invariants
//! - `order` always equals `priority.sort_key()`.
//! - `completed_at` is set only while `completed` is true.

use super::{now_epoch_ms, require_text, OwnerId, Priority, RecordId, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub text: String,
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
    pub order: i64,
    pub due_date: Option<NaiveDate>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub completed_at: Option<i64>,
}

impl Task {
    /// Creates an open task with a generated id.
    pub fn new(owner_id: OwnerId, text: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            text: text.into(),
            description: String::new(),
            completed: false,
            priority,
            order: priority.sort_key(),
            due_date: None,
            created_at: now_epoch_ms(),
            completed_at: None,
        }
    }

    /// Changes priority and keeps the derived sort key in step.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.order = priority.sort_key();
    }

    /// Flips completion and stamps or clears `completed_at`.
    pub fn toggle_complete(&mut self, now_ms: i64) {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now_ms) } else { None };
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("text", &self.text)?;
        if self.order != self.priority.sort_key() {
            return Err(ValidationError::UnknownValue {
                field: "order",
                value: self.order.to_string(),
            });
        }
        Ok(())
    }
}
