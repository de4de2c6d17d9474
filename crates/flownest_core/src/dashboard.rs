//! Application facade: one store connection, the current session, and live
//! feeds for every collection.
//!
//! # Responsibility
//! - Route every widget action through its service with the session's
//!   owner id.
//! - Publish a fresh owner-filtered snapshot after each successful write.
//! - Restore and persist the signed-in owner across restarts.
//!
//! # Invariants
//! - Callers never pass an owner id; it always comes from the session.
//! - A failed write publishes nothing.
//! - The connection is used from one thread at a time.

use crate::analytics::{self, Activity, AnalyticsReport, ProfileStats, WeeklySummary};
use crate::auth::{AuthError, AuthService, Identity, Session};
use crate::config::CoreConfig;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::export::{DataExport, ExportData, ExportError, WeeklyExport};
use crate::live::{CollectionFeed, Subscription};
use crate::model::calendar_event::CalendarEvent;
use crate::model::goal::Goal;
use crate::model::habit::Habit;
use crate::model::reflection::Reflection;
use crate::model::task::Task;
use crate::model::time_block::TimeBlock;
use crate::model::{OwnerId, Priority, RecordId};
use crate::preferences::{PreferenceError, PreferenceService};
use crate::repo::account_repo::SqliteAccountRepository;
use crate::repo::event_repo::SqliteEventRepository;
use crate::repo::goal_repo::SqliteGoalRepository;
use crate::repo::habit_repo::SqliteHabitRepository;
use crate::repo::preference_repo::SqlitePreferenceRepository;
use crate::repo::reflection_repo::SqliteReflectionRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use crate::repo::time_block_repo::SqliteTimeBlockRepository;
use crate::scoring::{focus_score, FocusScore};
use crate::service::calendar_service::{CalendarService, DayAgenda, DayMarker, NewEvent};
use crate::service::goal_service::{GoalService, GoalUpdate, NewGoal};
use crate::service::habit_service::HabitService;
use crate::service::reflection_service::{NewWeeklyReflection, ReflectionService};
use crate::service::task_service::{NewTask, TaskService, TaskUpdate};
use crate::service::time_block_service::{NewTimeBlock, TimeBlockService};
use crate::service::ServiceError;
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const RECENT_REFLECTION_LIMIT: u32 = 5;

#[derive(Debug)]
pub enum DashboardError {
    Db(DbError),
    Service(ServiceError),
    Auth(AuthError),
    Preference(PreferenceError),
    Export(ExportError),
}

impl Display for DashboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Preference(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DashboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::Preference(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<DbError> for DashboardError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ServiceError> for DashboardError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<AuthError> for DashboardError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<PreferenceError> for DashboardError {
    fn from(value: PreferenceError) -> Self {
        Self::Preference(value)
    }
}

impl From<ExportError> for DashboardError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Live feeds, one per owner-scoped collection.
pub struct Feeds {
    pub tasks: CollectionFeed<Task>,
    pub habits: CollectionFeed<Habit>,
    pub goals: CollectionFeed<Goal>,
    pub reflections: CollectionFeed<Reflection>,
    pub events: CollectionFeed<CalendarEvent>,
    pub time_blocks: CollectionFeed<TimeBlock>,
}

impl Default for Feeds {
    fn default() -> Self {
        Self {
            tasks: CollectionFeed::new("tasks"),
            habits: CollectionFeed::new("habits"),
            goals: CollectionFeed::new("goals"),
            reflections: CollectionFeed::new("reflections"),
            events: CollectionFeed::new("calendar_events"),
            time_blocks: CollectionFeed::new("time_blocks"),
        }
    }
}

pub struct Dashboard {
    conn: Connection,
    session: Session,
    feeds: Feeds,
}

impl Dashboard {
    /// Opens the store named by `config` and restores the last session.
    pub fn open(config: &CoreConfig) -> DashboardResult<Self> {
        Self::from_connection(open_db(&config.db_path)?)
    }

    pub fn open_path(path: impl AsRef<Path>) -> DashboardResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    pub fn open_in_memory() -> DashboardResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps a migrated connection. A persisted owner whose account no
    /// longer exists falls back to the guest session.
    pub fn from_connection(conn: Connection) -> DashboardResult<Self> {
        let mut dashboard = Self {
            conn,
            session: Session::guest(),
            feeds: Feeds::default(),
        };
        dashboard.restore_session()?;
        Ok(dashboard)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn feeds(&self) -> &Feeds {
        &self.feeds
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn owner_id(&self) -> OwnerId {
        self.session.owner_id()
    }

    pub fn preferences(&self) -> PreferenceService<SqlitePreferenceRepository<'_>> {
        PreferenceService::new(SqlitePreferenceRepository::new(&self.conn))
    }

    pub fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> DashboardResult<Identity> {
        let identity = self.auth().sign_up(email, password, display_name)?;
        self.enter_session(identity.clone())?;
        Ok(identity)
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> DashboardResult<Identity> {
        let identity = self.auth().sign_in(email, password)?;
        self.enter_session(identity.clone())?;
        Ok(identity)
    }

    pub fn sign_out(&mut self) -> DashboardResult<()> {
        self.preferences().clear_session_owner()?;
        self.session = Session::guest();
        info!("event=auth_sign_out module=dashboard status=ok");
        Ok(())
    }

    /// Renames the signed-in account. Guests have nothing to rename.
    pub fn update_display_name(&mut self, display_name: &str) -> DashboardResult<Identity> {
        let Some(current) = self.session.identity() else {
            return Err(AuthError::NotSignedIn.into());
        };
        let identity = self
            .auth()
            .update_display_name(current.owner_id, display_name)?;
        self.session = Session::signed_in(identity.clone());
        Ok(identity)
    }

    pub fn add_task(&self, text: &str, priority: Priority) -> DashboardResult<Option<Task>> {
        self.create_task(NewTask::new(text, priority))
    }

    pub fn create_task(&self, input: NewTask) -> DashboardResult<Option<Task>> {
        let task = self.tasks().create_task(self.owner_id(), input)?;
        if task.is_some() {
            self.publish_tasks()?;
        }
        Ok(task)
    }

    pub fn toggle_task(&self, id: RecordId) -> DashboardResult<Task> {
        let task = self.tasks().toggle_complete(self.owner_id(), id)?;
        self.publish_tasks()?;
        Ok(task)
    }

    pub fn update_task(&self, id: RecordId, update: TaskUpdate) -> DashboardResult<Task> {
        let task = self.tasks().update_task(self.owner_id(), id, update)?;
        self.publish_tasks()?;
        Ok(task)
    }

    pub fn delete_task(&self, id: RecordId) -> DashboardResult<()> {
        self.tasks().delete_task(self.owner_id(), id)?;
        self.publish_tasks()
    }

    pub fn list_tasks(&self) -> DashboardResult<Vec<Task>> {
        Ok(self.tasks().list_tasks(self.owner_id())?)
    }

    pub fn subscribe_tasks(&self) -> DashboardResult<Subscription<Task>> {
        Ok(self.feeds.tasks.subscribe(self.owner_id(), self.list_tasks()?))
    }

    pub fn add_habit(&self, name: &str) -> DashboardResult<Option<Habit>> {
        let habit = self.habits().add_habit(self.owner_id(), name)?;
        if habit.is_some() {
            self.publish_habits()?;
        }
        Ok(habit)
    }

    pub fn toggle_habit_day(&self, id: RecordId, day_index: usize) -> DashboardResult<Habit> {
        let habit = self.habits().toggle_day(self.owner_id(), id, day_index)?;
        self.publish_habits()?;
        Ok(habit)
    }

    pub fn rename_habit(&self, id: RecordId, name: &str) -> DashboardResult<Habit> {
        let habit = self.habits().rename_habit(self.owner_id(), id, name)?;
        self.publish_habits()?;
        Ok(habit)
    }

    pub fn delete_habit(&self, id: RecordId) -> DashboardResult<()> {
        self.habits().delete_habit(self.owner_id(), id)?;
        self.publish_habits()
    }

    pub fn list_habits(&self) -> DashboardResult<Vec<Habit>> {
        Ok(self.habits().list_habits(self.owner_id())?)
    }

    pub fn subscribe_habits(&self) -> DashboardResult<Subscription<Habit>> {
        Ok(self.feeds.habits.subscribe(self.owner_id(), self.list_habits()?))
    }

    pub fn add_goal(&self, input: NewGoal) -> DashboardResult<Option<Goal>> {
        let goal = self.goals().add_goal(self.owner_id(), input)?;
        if goal.is_some() {
            self.publish_goals()?;
        }
        Ok(goal)
    }

    pub fn set_goal_progress(&self, id: RecordId, current_value: f64) -> DashboardResult<Goal> {
        let goal = self.goals().set_progress(self.owner_id(), id, current_value)?;
        self.publish_goals()?;
        Ok(goal)
    }

    pub fn update_goal(&self, id: RecordId, update: GoalUpdate) -> DashboardResult<Goal> {
        let goal = self.goals().update_goal(self.owner_id(), id, update)?;
        self.publish_goals()?;
        Ok(goal)
    }

    pub fn delete_goal(&self, id: RecordId) -> DashboardResult<()> {
        self.goals().delete_goal(self.owner_id(), id)?;
        self.publish_goals()
    }

    pub fn list_goals(&self) -> DashboardResult<Vec<Goal>> {
        Ok(self.goals().list_goals(self.owner_id())?)
    }

    pub fn subscribe_goals(&self) -> DashboardResult<Subscription<Goal>> {
        Ok(self.feeds.goals.subscribe(self.owner_id(), self.list_goals()?))
    }

    pub fn save_reflection(&self, text: &str) -> DashboardResult<Option<Reflection>> {
        let reflection = self.reflections().save_reflection(self.owner_id(), text)?;
        if reflection.is_some() {
            self.publish_reflections()?;
        }
        Ok(reflection)
    }

    pub fn save_weekly_reflection(
        &self,
        input: NewWeeklyReflection,
    ) -> DashboardResult<Option<Reflection>> {
        let reflection = self.reflections().save_weekly(self.owner_id(), input)?;
        if reflection.is_some() {
            self.publish_reflections()?;
        }
        Ok(reflection)
    }

    pub fn delete_reflection(&self, id: RecordId) -> DashboardResult<()> {
        self.reflections().delete_reflection(self.owner_id(), id)?;
        self.publish_reflections()
    }

    pub fn list_reflections(&self) -> DashboardResult<Vec<Reflection>> {
        Ok(self.reflections().list_reflections(self.owner_id())?)
    }

    /// Newest five, as shown by the reflection widget.
    pub fn recent_reflections(&self) -> DashboardResult<Vec<Reflection>> {
        Ok(self
            .reflections()
            .recent_reflections(self.owner_id(), RECENT_REFLECTION_LIMIT)?)
    }

    pub fn subscribe_reflections(&self) -> DashboardResult<Subscription<Reflection>> {
        Ok(self
            .feeds
            .reflections
            .subscribe(self.owner_id(), self.list_reflections()?))
    }

    pub fn add_event(&self, input: NewEvent) -> DashboardResult<Option<CalendarEvent>> {
        let event = self.calendar().add_event(self.owner_id(), input)?;
        if event.is_some() {
            self.publish_events()?;
        }
        Ok(event)
    }

    pub fn delete_event(&self, id: RecordId) -> DashboardResult<()> {
        self.calendar().delete_event(self.owner_id(), id)?;
        self.publish_events()
    }

    pub fn list_events(&self) -> DashboardResult<Vec<CalendarEvent>> {
        Ok(self.calendar().list_events(self.owner_id())?)
    }

    pub fn events_in_month(&self, year: i32, month: u32) -> DashboardResult<Vec<CalendarEvent>> {
        Ok(self.calendar().events_in_month(self.owner_id(), year, month)?)
    }

    pub fn agenda(&self, date: NaiveDate) -> DashboardResult<DayAgenda> {
        Ok(self.calendar().agenda(self.owner_id(), date)?)
    }

    pub fn month_overview(&self, year: i32, month: u32) -> DashboardResult<Vec<DayMarker>> {
        Ok(self.calendar().month_overview(self.owner_id(), year, month)?)
    }

    pub fn subscribe_events(&self) -> DashboardResult<Subscription<CalendarEvent>> {
        Ok(self.feeds.events.subscribe(self.owner_id(), self.list_events()?))
    }

    pub fn add_time_block(
        &self,
        today: NaiveDate,
        input: NewTimeBlock,
    ) -> DashboardResult<Option<TimeBlock>> {
        let block = self.time_blocks().add_block(self.owner_id(), today, input)?;
        if block.is_some() {
            self.publish_time_blocks(today)?;
        }
        Ok(block)
    }

    pub fn delete_time_block(&self, today: NaiveDate, id: RecordId) -> DashboardResult<()> {
        self.time_blocks().delete_block(self.owner_id(), id)?;
        self.publish_time_blocks(today)
    }

    /// Today's blocks. Purging earlier days is a write, so it publishes.
    pub fn time_blocks_for(&self, today: NaiveDate) -> DashboardResult<Vec<TimeBlock>> {
        let service = self.time_blocks();
        let purged = service.purge_stale(self.owner_id(), today)?;
        let blocks = service.blocks_on(self.owner_id(), today)?;
        if purged > 0 {
            self.feeds
                .time_blocks
                .publish(self.owner_id(), blocks.clone());
        }
        Ok(blocks)
    }

    pub fn subscribe_time_blocks(&self, today: NaiveDate) -> DashboardResult<Subscription<TimeBlock>> {
        Ok(self
            .feeds
            .time_blocks
            .subscribe(self.owner_id(), self.time_blocks_for(today)?))
    }

    pub fn focus_score(&self, now_ms: i64) -> DashboardResult<FocusScore> {
        Ok(focus_score(&self.list_tasks()?, &self.list_habits()?, now_ms))
    }

    pub fn analytics(&self) -> DashboardResult<AnalyticsReport> {
        Ok(analytics::analytics_report(
            &self.list_tasks()?,
            &self.list_habits()?,
            &self.list_goals()?,
            &self.list_reflections()?,
        ))
    }

    pub fn weekly_summary(&self, today: NaiveDate) -> DashboardResult<WeeklySummary> {
        Ok(analytics::weekly_summary(
            &self.list_tasks()?,
            &self.list_habits()?,
            &self.list_goals()?,
            today,
        ))
    }

    pub fn recent_activity(&self) -> DashboardResult<Vec<Activity>> {
        Ok(analytics::recent_activity(
            &self.list_tasks()?,
            &self.list_goals()?,
            &self.list_reflections()?,
        ))
    }

    pub fn profile_stats(&self) -> DashboardResult<ProfileStats> {
        Ok(analytics::profile_stats(
            &self.list_tasks()?,
            &self.list_habits()?,
            &self.list_goals()?,
            &self.list_reflections()?,
        ))
    }

    pub fn data_export(&self, taken_at: DateTime<Utc>) -> DashboardResult<DataExport> {
        let data = ExportData {
            todos: self.list_tasks()?,
            habits: self.list_habits()?,
            goals: self.list_goals()?,
            reflections: self.list_reflections()?,
        };
        let email = self.session.identity().map(|identity| identity.email.clone());
        Ok(DataExport::new(self.owner_id(), email, data, taken_at))
    }

    /// Writes the full export into `dir` and returns the file path.
    pub fn export_to_dir(&self, dir: &Path, taken_at: DateTime<Utc>) -> DashboardResult<PathBuf> {
        let export = self.data_export(taken_at)?;
        Ok(export.write_to_dir(dir, taken_at.date_naive())?)
    }

    pub fn export_weekly_to_dir(
        &self,
        dir: &Path,
        taken_at: DateTime<Utc>,
    ) -> DashboardResult<PathBuf> {
        let today = taken_at.date_naive();
        let export = WeeklyExport::new(
            analytics::start_of_week(today),
            self.weekly_summary(today)?,
            taken_at,
        );
        Ok(export.write_to_dir(dir)?)
    }

    fn restore_session(&mut self) -> DashboardResult<()> {
        let Some(owner_id) = self.preferences().session_owner()? else {
            return Ok(());
        };
        match self.auth().identity(owner_id)? {
            Some(identity) => {
                info!("event=session_restore module=dashboard status=ok owner_id={owner_id}");
                self.session = Session::signed_in(identity);
            }
            None => {
                warn!(
                    "event=session_restore module=dashboard status=fallback owner_id={owner_id} reason=unknown_account"
                );
                self.preferences().clear_session_owner()?;
            }
        }
        Ok(())
    }

    fn enter_session(&mut self, identity: Identity) -> DashboardResult<()> {
        self.preferences().set_session_owner(identity.owner_id)?;
        self.session = Session::signed_in(identity);
        Ok(())
    }

    fn auth(&self) -> AuthService<SqliteAccountRepository<'_>> {
        AuthService::new(SqliteAccountRepository::new(&self.conn))
    }

    fn tasks(&self) -> TaskService<SqliteTaskRepository<'_>> {
        TaskService::new(SqliteTaskRepository::new(&self.conn))
    }

    fn habits(&self) -> HabitService<SqliteHabitRepository<'_>> {
        HabitService::new(SqliteHabitRepository::new(&self.conn))
    }

    fn goals(&self) -> GoalService<SqliteGoalRepository<'_>> {
        GoalService::new(SqliteGoalRepository::new(&self.conn))
    }

    fn reflections(&self) -> ReflectionService<SqliteReflectionRepository<'_>> {
        ReflectionService::new(SqliteReflectionRepository::new(&self.conn))
    }

    fn calendar(
        &self,
    ) -> CalendarService<
        SqliteEventRepository<'_>,
        SqliteTaskRepository<'_>,
        SqliteHabitRepository<'_>,
    > {
        CalendarService::new(
            SqliteEventRepository::new(&self.conn),
            SqliteTaskRepository::new(&self.conn),
            SqliteHabitRepository::new(&self.conn),
        )
    }

    fn time_blocks(&self) -> TimeBlockService<SqliteTimeBlockRepository<'_>> {
        TimeBlockService::new(SqliteTimeBlockRepository::new(&self.conn))
    }

    fn publish_tasks(&self) -> DashboardResult<()> {
        self.feeds.tasks.publish(self.owner_id(), self.list_tasks()?);
        Ok(())
    }

    fn publish_habits(&self) -> DashboardResult<()> {
        self.feeds.habits.publish(self.owner_id(), self.list_habits()?);
        Ok(())
    }

    fn publish_goals(&self) -> DashboardResult<()> {
        self.feeds.goals.publish(self.owner_id(), self.list_goals()?);
        Ok(())
    }

    fn publish_reflections(&self) -> DashboardResult<()> {
        self.feeds
            .reflections
            .publish(self.owner_id(), self.list_reflections()?);
        Ok(())
    }

    fn publish_events(&self) -> DashboardResult<()> {
        self.feeds.events.publish(self.owner_id(), self.list_events()?);
        Ok(())
    }

    fn publish_time_blocks(&self, today: NaiveDate) -> DashboardResult<()> {
        self.feeds
            .time_blocks
            .publish(self.owner_id(), self.time_blocks_for(today)?);
        Ok(())
    }
}
