//! Task use-case service (to-do widget and calendar task form).
//!
//! # Invariants
//! - Adding a task with blank text is a no-op.
//! - Listed tasks are ordered high → medium → low, then by creation.

use super::{non_blank, ServiceError, ServiceResult};
use crate::model::task::Task;
use crate::model::{now_epoch_ms, OwnerId, Priority, RecordId};
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use chrono::NaiveDate;
use log::{debug, info};

/// Input for the full task form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        Self {
            text: text.into(),
            priority,
            ..Self::default()
        }
    }
}

/// Field overwrites for an existing task. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub text: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<NaiveDate>>,
}

pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Quick-add from the to-do widget.
    pub fn add_task(
        &self,
        owner_id: OwnerId,
        text: &str,
        priority: Priority,
    ) -> ServiceResult<Option<Task>> {
        self.create_task(owner_id, NewTask::new(text, priority))
    }

    /// Creates a task from the full form; blank text is ignored.
    pub fn create_task(&self, owner_id: OwnerId, input: NewTask) -> ServiceResult<Option<Task>> {
        let Some(text) = non_blank(&input.text) else {
            debug!("event=task_add module=service status=skipped reason=empty_text");
            return Ok(None);
        };

        let mut task = Task::new(owner_id, text, input.priority);
        task.description = input.description.trim().to_string();
        task.due_date = input.due_date;
        self.repo.create_task(&task)?;
        info!(
            "event=task_add module=service status=ok task_id={} priority={}",
            task.id, task.priority
        );
        Ok(Some(task))
    }

    /// Flips the completed flag of one task.
    pub fn toggle_complete(&self, owner_id: OwnerId, id: RecordId) -> ServiceResult<Task> {
        let mut task = self.require(owner_id, id)?;
        task.toggle_complete(now_epoch_ms());
        self.repo.update_task(&task)?;
        info!(
            "event=task_toggle module=service status=ok task_id={} completed={}",
            task.id, task.completed
        );
        Ok(task)
    }

    /// Overwrites the provided fields; last write wins.
    pub fn update_task(
        &self,
        owner_id: OwnerId,
        id: RecordId,
        update: TaskUpdate,
    ) -> ServiceResult<Task> {
        let mut task = self.require(owner_id, id)?;
        if let Some(text) = update.text {
            task.text = text.trim().to_string();
        }
        if let Some(description) = update.description {
            task.description = description.trim().to_string();
        }
        if let Some(priority) = update.priority {
            task.set_priority(priority);
        }
        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
        }
        self.repo.update_task(&task)?;
        info!("event=task_update module=service status=ok task_id={}", task.id);
        Ok(task)
    }

    pub fn delete_task(&self, owner_id: OwnerId, id: RecordId) -> ServiceResult<()> {
        self.repo.delete_task(owner_id, id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    pub fn get_task(&self, owner_id: OwnerId, id: RecordId) -> ServiceResult<Option<Task>> {
        Ok(self.repo.get_task(owner_id, id)?)
    }

    pub fn list_tasks(&self, owner_id: OwnerId) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_tasks(owner_id, &TaskListQuery::default())?)
    }

    /// Tasks whose due date is `date`.
    pub fn tasks_due_on(&self, owner_id: OwnerId, date: NaiveDate) -> ServiceResult<Vec<Task>> {
        let query = TaskListQuery {
            due_on: Some(date),
            ..TaskListQuery::default()
        };
        Ok(self.repo.list_tasks(owner_id, &query)?)
    }

    fn require(&self, owner_id: OwnerId, id: RecordId) -> ServiceResult<Task> {
        self.repo
            .get_task(owner_id, id)?
            .ok_or(ServiceError::NotFound(id))
    }
}
