//! Time block repository contracts and SQLite implementation.

use super::{
    ensure_changed, format_date, format_time, parse_date, parse_time, parse_uuid, RepoError,
    RepoResult,
};
use crate::model::time_block::{BlockColor, TimeBlock};
use crate::model::{OwnerId, RecordId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

pub trait TimeBlockRepository {
    fn create_block(&self, block: &TimeBlock) -> RepoResult<RecordId>;
    /// Blocks scheduled on `date`, ordered by start time.
    fn list_blocks_on(&self, owner_id: OwnerId, date: NaiveDate) -> RepoResult<Vec<TimeBlock>>;
    fn delete_block(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()>;
    /// Removes every block dated before `date`; returns the number removed.
    fn purge_before(&self, owner_id: OwnerId, date: NaiveDate) -> RepoResult<usize>;
}

/// SQLite-backed time block repository.
pub struct SqliteTimeBlockRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTimeBlockRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TimeBlockRepository for SqliteTimeBlockRepository<'_> {
    fn create_block(&self, block: &TimeBlock) -> RepoResult<RecordId> {
        block.validate()?;

        self.conn.execute(
            "INSERT INTO time_blocks (
                id,
                owner_id,
                title,
                block_date,
                start_time,
                end_time,
                color,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                block.id.to_string(),
                block.owner_id.to_string(),
                block.title.as_str(),
                format_date(block.date),
                format_time(block.start_time),
                format_time(block.end_time),
                block.color.as_str(),
                block.created_at,
            ],
        )?;

        Ok(block.id)
    }

    fn list_blocks_on(&self, owner_id: OwnerId, date: NaiveDate) -> RepoResult<Vec<TimeBlock>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, title, block_date, start_time, end_time, color, created_at
             FROM time_blocks
             WHERE owner_id = ?1
               AND block_date = ?2
             ORDER BY start_time ASC, created_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query(params![owner_id.to_string(), format_date(date)])?;
        let mut blocks = Vec::new();
        while let Some(row) = rows.next()? {
            blocks.push(parse_block_row(row)?);
        }
        Ok(blocks)
    }

    fn delete_block(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM time_blocks WHERE id = ?1 AND owner_id = ?2;",
            params![id.to_string(), owner_id.to_string()],
        )?;
        ensure_changed(changed, id)
    }

    fn purge_before(&self, owner_id: OwnerId, date: NaiveDate) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM time_blocks WHERE owner_id = ?1 AND block_date < ?2;",
            params![owner_id.to_string(), format_date(date)],
        )?;
        Ok(removed)
    }
}

fn parse_block_row(row: &Row<'_>) -> RepoResult<TimeBlock> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;
    let date_text: String = row.get("block_date")?;
    let start_text: String = row.get("start_time")?;
    let end_text: String = row.get("end_time")?;
    let color_text: String = row.get("color")?;
    let color = BlockColor::parse(&color_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid color `{color_text}` in time_blocks.color"))
    })?;

    let block = TimeBlock {
        id: parse_uuid(&id_text, "time_blocks.id")?,
        owner_id: parse_uuid(&owner_text, "time_blocks.owner_id")?,
        title: row.get("title")?,
        date: parse_date(&date_text, "time_blocks.block_date")?,
        start_time: parse_time(&start_text, "time_blocks.start_time")?,
        end_time: parse_time(&end_text, "time_blocks.end_time")?,
        color,
        created_at: row.get("created_at")?,
    };
    block.validate()?;
    Ok(block)
}
