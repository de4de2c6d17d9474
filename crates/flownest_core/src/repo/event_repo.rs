//! Calendar event repository contracts and SQLite implementation.

use super::{
    ensure_changed, format_date, format_time, parse_date, parse_time, parse_uuid, RepoError,
    RepoResult,
};
use crate::model::calendar_event::CalendarEvent;
use crate::model::{OwnerId, Priority, RecordId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    title,
    description,
    due_date,
    due_time,
    priority,
    created_at
FROM calendar_events";

pub trait EventRepository {
    fn create_event(&self, event: &CalendarEvent) -> RepoResult<RecordId>;
    fn update_event(&self, event: &CalendarEvent) -> RepoResult<()>;
    /// Every event of the owner, ordered by date then time.
    fn list_events(&self, owner_id: OwnerId) -> RepoResult<Vec<CalendarEvent>>;
    /// Events with `from <= due_date <= to`, ordered by date then time.
    fn list_events_between(
        &self,
        owner_id: OwnerId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<CalendarEvent>>;
    fn delete_event(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()>;
}

/// SQLite-backed calendar event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &CalendarEvent) -> RepoResult<RecordId> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO calendar_events (
                id,
                owner_id,
                title,
                description,
                due_date,
                due_time,
                priority,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                event.id.to_string(),
                event.owner_id.to_string(),
                event.title.as_str(),
                event.description.as_str(),
                format_date(event.due_date),
                event.due_time.map(format_time),
                event.priority.as_str(),
                event.created_at,
            ],
        )?;

        Ok(event.id)
    }

    fn update_event(&self, event: &CalendarEvent) -> RepoResult<()> {
        event.validate()?;

        let changed = self.conn.execute(
            "UPDATE calendar_events
             SET
                title = ?1,
                description = ?2,
                due_date = ?3,
                due_time = ?4,
                priority = ?5
             WHERE id = ?6
               AND owner_id = ?7;",
            params![
                event.title.as_str(),
                event.description.as_str(),
                format_date(event.due_date),
                event.due_time.map(format_time),
                event.priority.as_str(),
                event.id.to_string(),
                event.owner_id.to_string(),
            ],
        )?;

        ensure_changed(changed, event.id)
    }

    fn list_events(&self, owner_id: OwnerId) -> RepoResult<Vec<CalendarEvent>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE owner_id = ?1
             ORDER BY due_date ASC, due_time ASC, created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn list_events_between(
        &self,
        owner_id: OwnerId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<CalendarEvent>> {
        // NULL due_time sorts first: all-day entries lead the day.
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE owner_id = ?1
               AND due_date >= ?2
               AND due_date <= ?3
             ORDER BY due_date ASC, due_time ASC, created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query(params![
            owner_id.to_string(),
            format_date(from),
            format_date(to)
        ])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn delete_event(&self, owner_id: OwnerId, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM calendar_events WHERE id = ?1 AND owner_id = ?2;",
            params![id.to_string(), owner_id.to_string()],
        )?;
        ensure_changed(changed, id)
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<CalendarEvent> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;
    let date_text: String = row.get("due_date")?;
    let due_time = match row.get::<_, Option<String>>("due_time")? {
        Some(value) => Some(parse_time(&value, "calendar_events.due_time")?),
        None => None,
    };
    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in calendar_events.priority"
        ))
    })?;

    let event = CalendarEvent {
        id: parse_uuid(&id_text, "calendar_events.id")?,
        owner_id: parse_uuid(&owner_text, "calendar_events.owner_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        due_date: parse_date(&date_text, "calendar_events.due_date")?,
        due_time,
        priority,
        created_at: row.get("created_at")?,
    };
    event.validate()?;
    Ok(event)
}
