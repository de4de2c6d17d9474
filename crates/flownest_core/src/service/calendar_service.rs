//! Calendar use-case service.
//!
//! Combines calendar events, due tasks and the habit week into day and
//! month views. Events stay independent of tasks.

use super::{non_blank, ServiceResult};
use crate::model::calendar_event::CalendarEvent;
use crate::model::habit::Habit;
use crate::model::task::Task;
use crate::model::{parse_clock_time, OwnerId, Priority, RecordId, ValidationError};
use crate::repo::event_repo::EventRepository;
use crate::repo::habit_repo::HabitRepository;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use chrono::{Datelike, NaiveDate};
use log::{debug, info};

/// Input for the add-event form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    /// Optional `HH:MM` start time.
    pub due_time: Option<String>,
    pub priority: Priority,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date,
            due_time: None,
            priority: Priority::default(),
        }
    }
}

/// Everything scheduled on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayAgenda {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
    pub events: Vec<CalendarEvent>,
}

/// Per-day counters for a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMarker {
    pub date: NaiveDate,
    pub task_count: usize,
    pub habit_count: usize,
    pub event_count: usize,
}

impl DayMarker {
    pub fn is_empty(&self) -> bool {
        self.task_count == 0 && self.habit_count == 0 && self.event_count == 0
    }
}

pub struct CalendarService<E, T, H>
where
    E: EventRepository,
    T: TaskRepository,
    H: HabitRepository,
{
    events: E,
    tasks: T,
    habits: H,
}

impl<E, T, H> CalendarService<E, T, H>
where
    E: EventRepository,
    T: TaskRepository,
    H: HabitRepository,
{
    pub fn new(events: E, tasks: T, habits: H) -> Self {
        Self {
            events,
            tasks,
            habits,
        }
    }

    /// Creates an event; a blank title is ignored.
    pub fn add_event(
        &self,
        owner_id: OwnerId,
        input: NewEvent,
    ) -> ServiceResult<Option<CalendarEvent>> {
        let Some(title) = non_blank(&input.title) else {
            debug!("event=calendar_add module=service status=skipped reason=empty_title");
            return Ok(None);
        };
        let due_time = match input.due_time.as_deref().and_then(non_blank) {
            Some(value) => Some(parse_clock_time(&value)?),
            None => None,
        };

        let mut event = CalendarEvent::new(owner_id, title, input.due_date);
        event.description = input.description.trim().to_string();
        event.due_time = due_time;
        event.priority = input.priority;
        self.events.create_event(&event)?;
        info!(
            "event=calendar_add module=service status=ok event_id={} due_date={}",
            event.id, event.due_date
        );
        Ok(Some(event))
    }

    pub fn delete_event(&self, owner_id: OwnerId, id: RecordId) -> ServiceResult<()> {
        self.events.delete_event(owner_id, id)?;
        info!("event=calendar_delete module=service status=ok event_id={id}");
        Ok(())
    }

    pub fn list_events(&self, owner_id: OwnerId) -> ServiceResult<Vec<CalendarEvent>> {
        Ok(self.events.list_events(owner_id)?)
    }

    pub fn events_on(&self, owner_id: OwnerId, date: NaiveDate) -> ServiceResult<Vec<CalendarEvent>> {
        Ok(self.events.list_events_between(owner_id, date, date)?)
    }

    pub fn events_in_month(
        &self,
        owner_id: OwnerId,
        year: i32,
        month: u32,
    ) -> ServiceResult<Vec<CalendarEvent>> {
        let (first, last) = month_bounds(year, month)?;
        Ok(self.events.list_events_between(owner_id, first, last)?)
    }

    /// Tasks due, habits checked for the weekday, and events on `date`.
    pub fn agenda(&self, owner_id: OwnerId, date: NaiveDate) -> ServiceResult<DayAgenda> {
        let tasks = self.tasks.list_tasks(
            owner_id,
            &TaskListQuery {
                due_on: Some(date),
                ..TaskListQuery::default()
            },
        )?;
        let habits = self
            .habits
            .list_habits(owner_id)?
            .into_iter()
            .filter(|habit| habit.is_checked_on(date))
            .collect();
        let events = self.events.list_events_between(owner_id, date, date)?;
        Ok(DayAgenda {
            date,
            tasks,
            habits,
            events,
        })
    }

    /// One marker per day of the month, in date order.
    pub fn month_overview(
        &self,
        owner_id: OwnerId,
        year: i32,
        month: u32,
    ) -> ServiceResult<Vec<DayMarker>> {
        let (first, last) = month_bounds(year, month)?;
        let tasks = self.tasks.list_tasks(owner_id, &TaskListQuery::default())?;
        let habits = self.habits.list_habits(owner_id)?;
        let events = self.events.list_events_between(owner_id, first, last)?;

        let markers = first
            .iter_days()
            .take_while(|date| *date <= last)
            .map(|date| DayMarker {
                date,
                task_count: tasks
                    .iter()
                    .filter(|task| task.due_date == Some(date))
                    .count(),
                habit_count: habits.iter().filter(|habit| habit.is_checked_on(date)).count(),
                event_count: events.iter().filter(|event| event.due_date == date).count(),
            })
            .collect();
        Ok(markers)
    }
}

/// First and last date of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let invalid = || ValidationError::UnknownValue {
        field: "month",
        value: format!("{year}-{month:02}"),
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;
    Ok((first, last))
}

#[cfg(test)]
mod tests {
    use super::month_bounds;
    use chrono::NaiveDate;

    #[test]
    fn month_bounds_handle_leap_february_and_december() {
        let (first, last) = month_bounds(2024, 2).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, last) = month_bounds(2023, 12).unwrap();
        assert_eq!(last, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

        assert!(month_bounds(2024, 13).is_err());
    }
}
