//! Local account storage backing sign-up and sign-in.

use super::{ensure_changed, parse_uuid, RepoResult};
use crate::model::OwnerId;
use rusqlite::{params, Connection, Row};

/// Stored account row. `password_hash` is a PHC string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub id: OwnerId,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: i64,
}

pub trait AccountRepository {
    fn create_account(&self, account: &AccountRecord) -> RepoResult<OwnerId>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<AccountRecord>>;
    fn get_account(&self, id: OwnerId) -> RepoResult<Option<AccountRecord>>;
    fn update_display_name(&self, id: OwnerId, display_name: &str) -> RepoResult<()>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, account: &AccountRecord) -> RepoResult<OwnerId> {
        self.conn.execute(
            "INSERT INTO accounts (id, email, display_name, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                account.id.to_string(),
                account.email.as_str(),
                account.display_name.as_str(),
                account.password_hash.as_str(),
                account.created_at,
            ],
        )?;
        Ok(account.id)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<AccountRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, display_name, password_hash, created_at
             FROM accounts
             WHERE email = ?1 COLLATE NOCASE;",
        )?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }
        Ok(None)
    }

    fn get_account(&self, id: OwnerId) -> RepoResult<Option<AccountRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, display_name, password_hash, created_at
             FROM accounts
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }
        Ok(None)
    }

    fn update_display_name(&self, id: OwnerId, display_name: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE accounts SET display_name = ?1 WHERE id = ?2;",
            params![display_name, id.to_string()],
        )?;
        ensure_changed(changed, id)
    }
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<AccountRecord> {
    let id_text: String = row.get("id")?;
    Ok(AccountRecord {
        id: parse_uuid(&id_text, "accounts.id")?,
        email: row.get("email")?,
        display_name: row.get("display_name")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
    })
}
