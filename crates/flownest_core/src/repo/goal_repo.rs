//! Goal repository contracts and SQLite implementation.

use super::{ensure_changed, parse_uuid, RepoError, RepoResult};
use crate::model::goal::{Goal, GoalType};
use crate::model::{OwnerId, RecordId};
use rusqlite::{params, Connection, Row};

const GOAL_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    title,
    description,
    target_value,
    current_value,
    goal_type,
    category,
    created_at
FROM goals";

pub trait GoalRepository {
    fn create_goal(&self, goal: &Goal) -> RepoResult<RecordId>;
    fn update_goal(&self, goal: &Goal) -> RepoResult<()>;
    fn get_goal(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<Option<Goal>>;
    fn list_goals(&self, owner_id: OwnerId) -> RepoResult<Vec<Goal>>;
    fn delete_goal(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()>;
}

/// SQLite-backed goal repository.
pub struct SqliteGoalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGoalRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn create_goal(&self, goal: &Goal) -> RepoResult<RecordId> {
        goal.validate()?;

        self.conn.execute(
            "INSERT INTO goals (
                id,
                owner_id,
                title,
                description,
                target_value,
                current_value,
                goal_type,
                category,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                goal.id.to_string(),
                goal.owner_id.to_string(),
                goal.title.as_str(),
                goal.description.as_str(),
                goal.target_value,
                goal.current_value,
                goal.goal_type.as_str(),
                goal.category.as_str(),
                goal.created_at,
            ],
        )?;

        Ok(goal.id)
    }

    fn update_goal(&self, goal: &Goal) -> RepoResult<()> {
        goal.validate()?;

        let changed = self.conn.execute(
            "UPDATE goals
             SET
                title = ?1,
                description = ?2,
                target_value = ?3,
                current_value = ?4,
                goal_type = ?5,
                category = ?6
             WHERE id = ?7
               AND owner_id = ?8;",
            params![
                goal.title.as_str(),
                goal.description.as_str(),
                goal.target_value,
                goal.current_value,
                goal.goal_type.as_str(),
                goal.category.as_str(),
                goal.id.to_string(),
                goal.owner_id.to_string(),
            ],
        )?;

        ensure_changed(changed, goal.id)
    }

    fn get_goal(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<Option<Goal>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GOAL_SELECT_SQL} WHERE id = ?1 AND owner_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![id.to_string(), owner_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_goal_row(row)?));
        }
        Ok(None)
    }

    fn list_goals(&self, owner_id: OwnerId) -> RepoResult<Vec<Goal>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GOAL_SELECT_SQL} WHERE owner_id = ?1 ORDER BY created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut goals = Vec::new();
        while let Some(row) = rows.next()? {
            goals.push(parse_goal_row(row)?);
        }
        Ok(goals)
    }

    fn delete_goal(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM goals WHERE id = ?1 AND owner_id = ?2;",
            params![id.to_string(), owner_id.to_string()],
        )?;
        ensure_changed(changed, id)
    }
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;
    let type_text: String = row.get("goal_type")?;
    let goal_type = GoalType::parse(&type_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid goal type `{type_text}` in goals.goal_type"))
    })?;

    let goal = Goal {
        id: parse_uuid(&id_text, "goals.id")?,
        owner_id: parse_uuid(&owner_text, "goals.owner_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        target_value: row.get("target_value")?,
        current_value: row.get("current_value")?,
        goal_type,
        category: row.get("category")?,
        created_at: row.get("created_at")?,
    };
    goal.validate()?;
    Ok(goal)
}
