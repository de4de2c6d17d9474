//! JSON export of an owner's collections and of the weekly summary.
//!
//! # Invariants
//! - Export documents only ever contain one owner's records.
//! - File names are derived from the export date, never from user text.

use crate::analytics::WeeklySummary;
use crate::model::goal::Goal;
use crate::model::habit::Habit;
use crate::model::reflection::Reflection;
use crate::model::task::Task;
use crate::model::OwnerId;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const EXPORT_FILE_PREFIX: &str = "flownest-data";
const WEEKLY_FILE_PREFIX: &str = "flownest-weekly-summary";

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to write export: {err}"),
            Self::Json(err) => write!(f, "failed to encode export: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportData {
    pub todos: Vec<Task>,
    pub habits: Vec<Habit>,
    pub goals: Vec<Goal>,
    pub reflections: Vec<Reflection>,
}

/// Full account download.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    /// RFC 3339 timestamp of when the export was taken.
    pub export_date: String,
    pub user_id: OwnerId,
    pub user_email: Option<String>,
    pub data: ExportData,
}

impl DataExport {
    pub fn new(
        owner_id: OwnerId,
        user_email: Option<String>,
        data: ExportData,
        taken_at: DateTime<Utc>,
    ) -> Self {
        Self {
            export_date: taken_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            user_id: owner_id,
            user_email,
            data,
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes `flownest-data-YYYY-MM-DD.json` into `dir`.
    pub fn write_to_dir(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf, ExportError> {
        let path = dir.join(export_file_name(date));
        write_json(&path, self)?;
        info!(
            "event=data_export module=export status=ok todos={} habits={} goals={} reflections={}",
            self.data.todos.len(),
            self.data.habits.len(),
            self.data.goals.len(),
            self.data.reflections.len()
        );
        Ok(path)
    }
}

/// Weekly summary download.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyExport {
    pub week_starting: NaiveDate,
    pub summary: WeeklySummary,
    pub export_date: String,
}

impl WeeklyExport {
    pub fn new(week_starting: NaiveDate, summary: WeeklySummary, taken_at: DateTime<Utc>) -> Self {
        Self {
            week_starting,
            summary,
            export_date: taken_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(weekly_file_name(self.week_starting));
        write_json(&path, self)?;
        info!("event=weekly_export module=export status=ok");
        Ok(path)
    }
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}-{}.json", date.format("%Y-%m-%d"))
}

pub fn weekly_file_name(week_starting: NaiveDate) -> String {
    format!("{WEEKLY_FILE_PREFIX}-{}.json", week_starting.format("%Y-%m-%d"))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, weekly_file_name};
    use chrono::NaiveDate;

    #[test]
    fn file_names_embed_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "flownest-data-2024-03-09.json");
        assert_eq!(
            weekly_file_name(date),
            "flownest-weekly-summary-2024-03-09.json"
        );
    }
}
