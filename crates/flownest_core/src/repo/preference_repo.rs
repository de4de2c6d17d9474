//! Device-level key/value preference storage.
//!
//! Values are opaque strings here; the preferences service owns their JSON
//! encoding.

use super::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

pub trait PreferenceRepository {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>>;
    fn set_value(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Returns whether a value was removed.
    fn remove_value(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed preference repository.
pub struct SqlitePreferenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePreferenceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PreferenceRepository for SqlitePreferenceRepository<'_> {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_value(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_value(&self, key: &str) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM preferences WHERE key = ?1;", [key])?;
        Ok(removed > 0)
    }
}
