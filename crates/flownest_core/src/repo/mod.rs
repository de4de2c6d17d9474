//! Repository layer: owner-scoped persistence for every collection.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts, one per collection.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths call the record's `validate()` before SQL mutations.
//! - Every record query filters on `owner_id` with an equality predicate;
//!   a row owned by somebody else is reported as `NotFound`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::{RecordId, ValidationError};
use chrono::{NaiveDate, NaiveTime};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod account_repo;
pub mod event_repo;
pub mod goal_repo;
pub mod habit_repo;
pub mod preference_repo;
pub mod reflection_repo;
pub mod task_repo;
pub mod time_block_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(RecordId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

pub(crate) fn parse_time(value: &str, column: &str) -> RepoResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid time `{value}` in {column}")))
}

pub(crate) fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn ensure_changed(changed: usize, id: RecordId) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound(id));
    }
    Ok(())
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
