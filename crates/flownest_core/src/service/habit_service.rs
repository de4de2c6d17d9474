//! Habit use-case service (weekly habit grid).

use super::{non_blank, ServiceError, ServiceResult};
use crate::model::habit::Habit;
use crate::model::{OwnerId, RecordId};
use crate::repo::habit_repo::HabitRepository;
use chrono::NaiveDate;
use log::{debug, info};

pub struct HabitService<R: HabitRepository> {
    repo: R,
}

impl<R: HabitRepository> HabitService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a habit with an empty week; blank names are ignored.
    pub fn add_habit(&self, owner_id: OwnerId, name: &str) -> ServiceResult<Option<Habit>> {
        let Some(name) = non_blank(name) else {
            debug!("event=habit_add module=service status=skipped reason=empty_name");
            return Ok(None);
        };

        let habit = Habit::new(owner_id, name);
        self.repo.create_habit(&habit)?;
        info!("event=habit_add module=service status=ok habit_id={}", habit.id);
        Ok(Some(habit))
    }

    /// Flips one day cell and persists the whole week.
    pub fn toggle_day(
        &self,
        owner_id: OwnerId,
        id: RecordId,
        day_index: usize,
    ) -> ServiceResult<Habit> {
        let mut habit = self.require(owner_id, id)?;
        let checked = habit.toggle_day(day_index)?;
        self.repo.update_habit(&habit)?;
        info!(
            "event=habit_toggle module=service status=ok habit_id={} day={} checked={}",
            habit.id, day_index, checked
        );
        Ok(habit)
    }

    pub fn rename_habit(&self, owner_id: OwnerId, id: RecordId, name: &str) -> ServiceResult<Habit> {
        let mut habit = self.require(owner_id, id)?;
        habit.name = name.trim().to_string();
        self.repo.update_habit(&habit)?;
        Ok(habit)
    }

    pub fn delete_habit(&self, owner_id: OwnerId, id: RecordId) -> ServiceResult<()> {
        self.repo.delete_habit(owner_id, id)?;
        info!("event=habit_delete module=service status=ok habit_id={id}");
        Ok(())
    }

    pub fn list_habits(&self, owner_id: OwnerId) -> ServiceResult<Vec<Habit>> {
        Ok(self.repo.list_habits(owner_id)?)
    }

    /// Habits whose weekday slot for `date` is checked.
    pub fn habits_on(&self, owner_id: OwnerId, date: NaiveDate) -> ServiceResult<Vec<Habit>> {
        let habits = self.repo.list_habits(owner_id)?;
        Ok(habits
            .into_iter()
            .filter(|habit| habit.is_checked_on(date))
            .collect())
    }

    fn require(&self, owner_id: OwnerId, id: RecordId) -> ServiceResult<Habit> {
        self.repo
            .get_habit(owner_id, id)?
            .ok_or(ServiceError::NotFound(id))
    }
}
