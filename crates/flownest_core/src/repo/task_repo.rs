//! Task repository contracts and SQLite implementation.
//!
//! # Invariants
//! - List order is `sort_order ASC, created_at ASC, id ASC`.

use super::{
    bool_to_int, ensure_changed, format_date, parse_date, parse_flag, parse_uuid, RepoError,
    RepoResult,
};
use crate::model::task::Task;
use crate::model::{OwnerId, Priority, RecordId};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    text,
    description,
    completed,
    priority,
    sort_order,
    due_date,
    created_at,
    completed_at
FROM tasks";

/// Filter options for listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Only tasks due on this date.
    pub due_on: Option<NaiveDate>,
    /// Only completed (`true`) or open (`false`) tasks.
    pub completed: Option<bool>,
}

pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<RecordId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, owner_id: OwnerId, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<RecordId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                owner_id,
                text,
                description,
                completed,
                priority,
                sort_order,
                due_date,
                created_at,
                completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                task.id.to_string(),
                task.owner_id.to_string(),
                task.text.as_str(),
                task.description.as_str(),
                bool_to_int(task.completed),
                task.priority.as_str(),
                task.order,
                task.due_date.map(format_date),
                task.created_at,
                task.completed_at,
            ],
        )?;

        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                text = ?1,
                description = ?2,
                completed = ?3,
                priority = ?4,
                sort_order = ?5,
                due_date = ?6,
                completed_at = ?7
             WHERE id = ?8
               AND owner_id = ?9;",
            params![
                task.text.as_str(),
                task.description.as_str(),
                bool_to_int(task.completed),
                task.priority.as_str(),
                task.order,
                task.due_date.map(format_date),
                task.completed_at,
                task.id.to_string(),
                task.owner_id.to_string(),
            ],
        )?;

        ensure_changed(changed, task.id)
    }

    fn get_task(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE id = ?1
               AND owner_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), owner_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, owner_id: OwnerId, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE owner_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(owner_id.to_string())];

        if let Some(date) = query.due_on {
            sql.push_str(" AND due_date = ?");
            bind_values.push(Value::Text(format_date(date)));
        }

        if let Some(completed) = query.completed {
            sql.push_str(" AND completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        sql.push_str(" ORDER BY sort_order ASC, created_at ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2;",
            params![id.to_string(), owner_id.to_string()],
        )?;

        ensure_changed(changed, id)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;
    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;
    let due_date = match row.get::<_, Option<String>>("due_date")? {
        Some(value) => Some(parse_date(&value, "tasks.due_date")?),
        None => None,
    };

    let task = Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        owner_id: parse_uuid(&owner_text, "tasks.owner_id")?,
        text: row.get("text")?,
        description: row.get("description")?,
        completed: parse_flag(row.get("completed")?, "tasks.completed")?,
        priority,
        order: row.get("sort_order")?,
        due_date,
        created_at: row.get("created_at")?,
        completed_at: row.get("completed_at")?,
    };
    task.validate()?;
    Ok(task)
}
