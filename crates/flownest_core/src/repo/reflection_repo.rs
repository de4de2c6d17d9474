//! Reflection repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Lists are newest first.

use super::{ensure_changed, parse_uuid, RepoResult};
use crate::model::reflection::{Mood, Reflection};
use crate::model::{OwnerId, RecordId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const REFLECTION_SELECT_SQL: &str =
    "SELECT id, owner_id, title, text, mood, created_at FROM reflections";

pub trait ReflectionRepository {
    fn create_reflection(&self, reflection: &Reflection) -> RepoResult<RecordId>;
    fn list_reflections(&self, owner_id: OwnerId, limit: Option<u32>)
        -> RepoResult<Vec<Reflection>>;
    fn delete_reflection(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()>;
}

/// SQLite-backed reflection repository.
pub struct SqliteReflectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReflectionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReflectionRepository for SqliteReflectionRepository<'_> {
    fn create_reflection(&self, reflection: &Reflection) -> RepoResult<RecordId> {
        reflection.validate()?;

        self.conn.execute(
            "INSERT INTO reflections (id, owner_id, title, text, mood, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                reflection.id.to_string(),
                reflection.owner_id.to_string(),
                reflection.title.as_deref(),
                reflection.text.as_str(),
                reflection.mood.as_str(),
                reflection.created_at,
            ],
        )?;

        Ok(reflection.id)
    }

    fn list_reflections(
        &self,
        owner_id: OwnerId,
        limit: Option<u32>,
    ) -> RepoResult<Vec<Reflection>> {
        let mut sql =
            format!("{REFLECTION_SELECT_SQL} WHERE owner_id = ? ORDER BY created_at DESC, id ASC");
        let mut bind_values: Vec<Value> = vec![Value::Text(owner_id.to_string())];
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut reflections = Vec::new();
        while let Some(row) = rows.next()? {
            reflections.push(parse_reflection_row(row)?);
        }
        Ok(reflections)
    }

    fn delete_reflection(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM reflections WHERE id = ?1 AND owner_id = ?2;",
            params![id.to_string(), owner_id.to_string()],
        )?;
        ensure_changed(changed, id)
    }
}

fn parse_reflection_row(row: &Row<'_>) -> RepoResult<Reflection> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;
    let mood_text: String = row.get("mood")?;
    let reflection = Reflection {
        id: parse_uuid(&id_text, "reflections.id")?,
        owner_id: parse_uuid(&owner_text, "reflections.owner_id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        mood: Mood::parse(&mood_text)?,
        created_at: row.get("created_at")?,
    };
    reflection.validate()?;
    Ok(reflection)
}
