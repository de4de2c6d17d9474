//! Habit repository contracts and SQLite implementation.

use super::{ensure_changed, parse_uuid, RepoError, RepoResult};
use crate::model::habit::{decode_days, encode_days, Habit};
use crate::model::{OwnerId, RecordId};
use rusqlite::{params, Connection, Row};

const HABIT_SELECT_SQL: &str = "SELECT id, owner_id, name, days, created_at FROM habits";

pub trait HabitRepository {
    fn create_habit(&self, habit: &Habit) -> RepoResult<RecordId>;
    fn update_habit(&self, habit: &Habit) -> RepoResult<()>;
    fn get_habit(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<Option<Habit>>;
    fn list_habits(&self, owner_id: OwnerId) -> RepoResult<Vec<Habit>>;
    fn delete_habit(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&self, habit: &Habit) -> RepoResult<RecordId> {
        habit.validate()?;

        self.conn.execute(
            "INSERT INTO habits (id, owner_id, name, days, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                habit.id.to_string(),
                habit.owner_id.to_string(),
                habit.name.as_str(),
                encode_days(&habit.days),
                habit.created_at,
            ],
        )?;

        Ok(habit.id)
    }

    fn update_habit(&self, habit: &Habit) -> RepoResult<()> {
        habit.validate()?;

        let changed = self.conn.execute(
            "UPDATE habits
             SET name = ?1, days = ?2
             WHERE id = ?3
               AND owner_id = ?4;",
            params![
                habit.name.as_str(),
                encode_days(&habit.days),
                habit.id.to_string(),
                habit.owner_id.to_string(),
            ],
        )?;

        ensure_changed(changed, habit.id)
    }

    fn get_habit(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<Option<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL} WHERE id = ?1 AND owner_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![id.to_string(), owner_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_habit_row(row)?));
        }
        Ok(None)
    }

    fn list_habits(&self, owner_id: OwnerId) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL} WHERE owner_id = ?1 ORDER BY created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn delete_habit(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1 AND owner_id = ?2;",
            params![id.to_string(), owner_id.to_string()],
        )?;
        ensure_changed(changed, id)
    }
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;
    let days_text: String = row.get("days")?;
    let days = decode_days(&days_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid week `{days_text}` in habits.days"))
    })?;

    let habit = Habit {
        id: parse_uuid(&id_text, "habits.id")?,
        owner_id: parse_uuid(&owner_text, "habits.owner_id")?,
        name: row.get("name")?,
        days,
        created_at: row.get("created_at")?,
    };
    habit.validate()?;
    Ok(habit)
}
