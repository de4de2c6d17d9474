//! Schema history for the FlowNest store.
//!
//! Version 1 holds the six dashboard collections, 2 adds local accounts,
//! 3 the device preference table and 4 the title and mood columns of
//! weekly reflections. Every step only adds tables or columns, so rows
//! written by an older build stay readable.
//!
//! # Invariants
//! - Versions are 1-based and contiguous; `PRAGMA user_version` holds the
//!   last one applied.
//! - Pending steps commit together or not at all.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "collections",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "accounts",
        sql: include_str!("0002_accounts.sql"),
    },
    Migration {
        version: 3,
        name: "preferences",
        sql: include_str!("0003_preferences.sql"),
    },
    Migration {
        version: 4,
        name: "reflection_moods",
        sql: include_str!("0004_reflection_moods.sql"),
    },
];

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the store up to `latest_version()`. Returns the steps that ran.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<Vec<&'static str>> {
    let stored = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();
    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > stored)
        .collect();
    if pending.is_empty() {
        debug!("event=db_migrate module=db status=up_to_date version={stored}");
        return Ok(Vec::new());
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        tx.execute_batch(migration.sql)
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        tx.pragma_update(None, "user_version", migration.version)?;
    }
    tx.commit()?;

    let applied: Vec<&'static str> = pending.iter().map(|migration| migration.name).collect();
    info!(
        "event=db_migrate module=db status=ok from_version={stored} to_version={latest} steps={}",
        applied.join(",")
    );
    Ok(applied)
}
