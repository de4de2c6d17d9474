//! Device-level preferences stored as JSON values in the `preferences` table.
//!
//! # Responsibility
//! - Own the key names and JSON shapes of every persisted preference.
//! - Supply defaults when a key is missing.
//!
//! # Invariants
//! - A stored value that fails to decode is logged and treated as missing;
//!   reads never fail because of a corrupt value.
//! - Preferences are not owner-scoped; they belong to the device.

use crate::model::reflection::Mood;
use crate::model::{OwnerId, ValidationError};
use crate::quotes::{motivation_for, next_motivation, Quote};
use crate::repo::preference_repo::PreferenceRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const KEY_DARK_MODE: &str = "darkMode";
pub const KEY_WIDGETS: &str = "widgets";
pub const KEY_POMODORO: &str = "pomodoroSettings";
pub const KEY_NOTIFICATIONS: &str = "notifications";
pub const KEY_CURRENT_MOOD: &str = "currentMood";
pub const KEY_MOTIVATION: &str = "dailyMotivation";
pub const KEY_MOTIVATION_DATE: &str = "dailyMotivationDate";
pub const KEY_SESSION_OWNER: &str = "session.ownerId";

const WORK_MINUTES_RANGE: (u32, u32) = (1, 60);
const SHORT_BREAK_MINUTES_RANGE: (u32, u32) = (1, 30);
const LONG_BREAK_MINUTES_RANGE: (u32, u32) = (1, 60);

#[derive(Debug)]
pub enum PreferenceError {
    Repo(RepoError),
    Encode(serde_json::Error),
    Validation(ValidationError),
}

impl Display for PreferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode preference: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PreferenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<RepoError> for PreferenceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ValidationError> for PreferenceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type PreferenceResult<T> = Result<T, PreferenceError>;

/// Which home-page widgets are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetVisibility {
    pub todo: bool,
    pub pomodoro: bool,
    pub habit: bool,
}

impl Default for WidgetVisibility {
    fn default() -> Self {
        Self {
            todo: true,
            pomodoro: true,
            habit: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    Todo,
    Pomodoro,
    Habit,
}

impl Widget {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "pomodoro" => Ok(Self::Pomodoro),
            "habit" => Ok(Self::Habit),
            other => Err(ValidationError::UnknownValue {
                field: "widget",
                value: other.to_string(),
            }),
        }
    }
}

impl WidgetVisibility {
    pub fn is_visible(&self, widget: Widget) -> bool {
        match widget {
            Widget::Todo => self.todo,
            Widget::Pomodoro => self.pomodoro,
            Widget::Habit => self.habit,
        }
    }

    fn slot(&mut self, widget: Widget) -> &mut bool {
        match widget {
            Widget::Todo => &mut self.todo,
            Widget::Pomodoro => &mut self.pomodoro,
            Widget::Habit => &mut self.habit,
        }
    }
}

/// Timer durations in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    pub work_duration: u32,
    pub short_break_duration: u32,
    pub long_break_duration: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break_duration: 5,
            long_break_duration: 15,
        }
    }
}

impl PomodoroSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_minutes("work_duration", self.work_duration, WORK_MINUTES_RANGE)?;
        check_minutes(
            "short_break_duration",
            self.short_break_duration,
            SHORT_BREAK_MINUTES_RANGE,
        )?;
        check_minutes(
            "long_break_duration",
            self.long_break_duration,
            LONG_BREAK_MINUTES_RANGE,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub reminders: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            push: false,
            reminders: true,
        }
    }
}

pub struct PreferenceService<R: PreferenceRepository> {
    repo: R,
}

impl<R: PreferenceRepository> PreferenceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stored dark-mode flag, or `system_default` when never set.
    pub fn dark_mode(&self, system_default: bool) -> PreferenceResult<bool> {
        Ok(self.read(KEY_DARK_MODE)?.unwrap_or(system_default))
    }

    pub fn set_dark_mode(&self, enabled: bool) -> PreferenceResult<()> {
        self.write(KEY_DARK_MODE, &enabled)
    }

    /// Flips dark mode and returns the new value.
    pub fn toggle_dark_mode(&self, system_default: bool) -> PreferenceResult<bool> {
        let next = !self.dark_mode(system_default)?;
        self.set_dark_mode(next)?;
        Ok(next)
    }

    pub fn widgets(&self) -> PreferenceResult<WidgetVisibility> {
        Ok(self.read(KEY_WIDGETS)?.unwrap_or_default())
    }

    pub fn set_widgets(&self, widgets: WidgetVisibility) -> PreferenceResult<()> {
        self.write(KEY_WIDGETS, &widgets)
    }

    pub fn toggle_widget(&self, widget: Widget) -> PreferenceResult<WidgetVisibility> {
        let mut widgets = self.widgets()?;
        let slot = widgets.slot(widget);
        *slot = !*slot;
        self.set_widgets(widgets)?;
        Ok(widgets)
    }

    pub fn pomodoro_settings(&self) -> PreferenceResult<PomodoroSettings> {
        let stored: Option<PomodoroSettings> = self.read(KEY_POMODORO)?;
        match stored {
            Some(settings) if settings.validate().is_ok() => Ok(settings),
            Some(_) => {
                warn!(
                    "event=preference_read module=preferences status=fallback key={} reason=out_of_range",
                    KEY_POMODORO
                );
                Ok(PomodoroSettings::default())
            }
            None => Ok(PomodoroSettings::default()),
        }
    }

    pub fn set_pomodoro_settings(&self, settings: PomodoroSettings) -> PreferenceResult<()> {
        settings.validate()?;
        self.write(KEY_POMODORO, &settings)
    }

    pub fn notifications(&self) -> PreferenceResult<NotificationSettings> {
        Ok(self.read(KEY_NOTIFICATIONS)?.unwrap_or_default())
    }

    pub fn set_notifications(&self, settings: NotificationSettings) -> PreferenceResult<()> {
        self.write(KEY_NOTIFICATIONS, &settings)
    }

    /// Mood picked on the reflections page; neutral until one is chosen.
    pub fn current_mood(&self) -> PreferenceResult<Mood> {
        Ok(self.read(KEY_CURRENT_MOOD)?.unwrap_or_default())
    }

    pub fn set_current_mood(&self, mood: Mood) -> PreferenceResult<()> {
        self.write(KEY_CURRENT_MOOD, &mood)
    }

    /// Restores widget, timer and notification defaults. Dark mode, the
    /// current mood and the session are left alone.
    pub fn reset_settings(&self) -> PreferenceResult<()> {
        self.set_widgets(WidgetVisibility::default())?;
        self.set_pomodoro_settings(PomodoroSettings::default())?;
        self.set_notifications(NotificationSettings::default())?;
        info!("event=settings_reset module=preferences status=ok");
        Ok(())
    }

    /// Owner id of the last signed-in account, if any.
    pub fn session_owner(&self) -> PreferenceResult<Option<OwnerId>> {
        self.read(KEY_SESSION_OWNER)
    }

    pub fn set_session_owner(&self, owner_id: OwnerId) -> PreferenceResult<()> {
        self.write(KEY_SESSION_OWNER, &owner_id)
    }

    pub fn clear_session_owner(&self) -> PreferenceResult<()> {
        self.repo.remove_value(KEY_SESSION_OWNER)?;
        Ok(())
    }

    /// Cached quote for `today`; picks and caches a new one on a new day.
    pub fn daily_motivation(&self, today: NaiveDate) -> PreferenceResult<Quote> {
        let cached_date: Option<NaiveDate> = self.read(KEY_MOTIVATION_DATE)?;
        if cached_date == Some(today) {
            if let Some(quote) = self.read::<Quote>(KEY_MOTIVATION)? {
                return Ok(quote);
            }
        }
        let quote = motivation_for(today);
        self.store_motivation(today, &quote)?;
        Ok(quote)
    }

    /// Replaces today's quote with the next one from the pool.
    pub fn refresh_motivation(&self, today: NaiveDate) -> PreferenceResult<Quote> {
        let current = self.daily_motivation(today)?;
        let quote = next_motivation(&current);
        self.store_motivation(today, &quote)?;
        Ok(quote)
    }

    fn store_motivation(&self, today: NaiveDate, quote: &Quote) -> PreferenceResult<()> {
        self.write(KEY_MOTIVATION, quote)?;
        self.write(KEY_MOTIVATION_DATE, &today)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> PreferenceResult<Option<T>> {
        let Some(raw) = self.repo.get_value(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(
                    "event=preference_read module=preferences status=fallback key={} error={}",
                    key, err
                );
                Ok(None)
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> PreferenceResult<()> {
        let encoded = serde_json::to_string(value).map_err(PreferenceError::Encode)?;
        self.repo.set_value(key, &encoded)?;
        info!("event=preference_write module=preferences status=ok key={key}");
        Ok(())
    }
}

fn check_minutes(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::UnknownValue {
            field,
            value: format!("{value} (expected {min}..={max} minutes)"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PomodoroSettings, Widget, WidgetVisibility};

    #[test]
    fn pomodoro_defaults_are_25_5_15_and_valid() {
        let settings = PomodoroSettings::default();
        assert_eq!(
            (
                settings.work_duration,
                settings.short_break_duration,
                settings.long_break_duration
            ),
            (25, 5, 15)
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn pomodoro_rejects_out_of_range_minutes() {
        let settings = PomodoroSettings {
            short_break_duration: 45,
            ..PomodoroSettings::default()
        };
        assert!(settings.validate().is_err());
        let settings = PomodoroSettings {
            work_duration: 0,
            ..PomodoroSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn pomodoro_json_uses_camel_case_keys() {
        let json = serde_json::to_value(PomodoroSettings::default()).unwrap();
        assert_eq!(json["workDuration"], 25);
        assert_eq!(json["shortBreakDuration"], 5);
        assert_eq!(json["longBreakDuration"], 15);
    }

    #[test]
    fn widget_names_parse() {
        assert_eq!(Widget::parse("Todo").unwrap(), Widget::Todo);
        assert!(Widget::parse("weather").is_err());
        assert!(WidgetVisibility::default().is_visible(Widget::Habit));
    }
}
