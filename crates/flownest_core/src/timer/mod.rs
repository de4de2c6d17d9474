//! Pomodoro countdown state machine.
//!
//! # Responsibility
//! - Track mode, run state and remaining seconds of the countdown.
//! - Report completion exactly once when the countdown reaches zero.
//!
//! # Invariants
//! - Remaining time never goes below zero.
//! - Reaching zero stops the timer and leaves it `Idle` with 0 remaining.
//! - `tick` only changes anything while `Running`.
//! - Nothing here is persisted; a new timer always starts from defaults.
//!
//! # See also
//! - [`driver`] for the one-second background tick.

use crate::model::ValidationError;
use crate::preferences::PomodoroSettings;
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub mod driver;

pub use driver::{CompletionSink, LogCompletionSink, SinkError, TimerDriver};

const SECONDS_PER_MINUTE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    #[default]
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pomodoro => "pomodoro",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pomodoro" | "work" => Ok(Self::Pomodoro),
            "short_break" | "shortbreak" | "short" => Ok(Self::ShortBreak),
            "long_break" | "longbreak" | "long" => Ok(Self::LongBreak),
            other => Err(ValidationError::UnknownValue {
                field: "timer mode",
                value: other.to_string(),
            }),
        }
    }
}

impl Display for TimerMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Looping background sound played on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientSound {
    #[default]
    None,
    Rain,
    Cafe,
    WhiteNoise,
}

impl AmbientSound {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "none" => Ok(Self::None),
            "rain" => Ok(Self::Rain),
            "cafe" => Ok(Self::Cafe),
            "whitenoise" => Ok(Self::WhiteNoise),
            other => Err(ValidationError::UnknownValue {
                field: "ambient sound",
                value: other.to_string(),
            }),
        }
    }

    /// Relative asset path, `None` for silence.
    pub fn asset_path(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Rain => Some("sounds/rain.mp3"),
            Self::Cafe => Some("sounds/cafe.mp3"),
            Self::WhiteNoise => Some("sounds/whiteNoise.mp3"),
        }
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running; nothing changed.
    Ignored,
    /// One second elapsed; `remaining` seconds are left.
    Ticked { remaining: u32 },
    /// Countdown hit zero on this tick. The timer is now idle.
    Completed { mode: TimerMode },
}

/// Countdown durations per mode, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub pomodoro: u32,
    pub short_break: u32,
    pub long_break: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self::from(PomodoroSettings::default())
    }
}

impl From<PomodoroSettings> for Durations {
    fn from(settings: PomodoroSettings) -> Self {
        Self {
            pomodoro: settings.work_duration.saturating_mul(SECONDS_PER_MINUTE),
            short_break: settings.short_break_duration.saturating_mul(SECONDS_PER_MINUTE),
            long_break: settings.long_break_duration.saturating_mul(SECONDS_PER_MINUTE),
        }
    }
}

impl Durations {
    pub fn for_mode(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Pomodoro => self.pomodoro,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    mode: TimerMode,
    state: TimerState,
    remaining: u32,
    durations: Durations,
    sound: AmbientSound,
    volume: f32,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}

impl PomodoroTimer {
    pub fn new(durations: Durations) -> Self {
        Self {
            mode: TimerMode::Pomodoro,
            state: TimerState::Idle,
            remaining: durations.pomodoro,
            durations,
            sound: AmbientSound::None,
            volume: 0.5,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Starts or resumes. A finished countdown restarts from the full
    /// duration of the current mode.
    pub fn start(&mut self) {
        if self.state == TimerState::Idle && self.remaining == 0 {
            self.remaining = self.durations.for_mode(self.mode);
        }
        self.state = TimerState::Running;
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stops and reloads the current mode's duration.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.remaining = self.durations.for_mode(self.mode);
    }

    /// Switches mode; always stops and reloads.
    pub fn change_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.reset();
    }

    /// New durations take effect immediately when idle, otherwise on the
    /// next reset or mode change.
    pub fn set_durations(&mut self, durations: Durations) {
        self.durations = durations;
        if self.state == TimerState::Idle {
            self.remaining = durations.for_mode(self.mode);
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state != TimerState::Running {
            return TickOutcome::Ignored;
        }
        if self.remaining <= 1 {
            self.remaining = 0;
            self.state = TimerState::Idle;
            return TickOutcome::Completed { mode: self.mode };
        }
        self.remaining -= 1;
        TickOutcome::Ticked {
            remaining: self.remaining,
        }
    }

    pub fn sound(&self) -> AmbientSound {
        self.sound
    }

    pub fn set_sound(&mut self, sound: AmbientSound) {
        self.sound = sound;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Clamped to `0.0..=1.0`; NaN is treated as silence.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Remaining time as `MM:SS`.
    pub fn formatted(&self) -> String {
        format_mm_ss(self.remaining)
    }
}

pub fn format_mm_ss(seconds: u32) -> String {
    format!(
        "{:02}:{:02}",
        seconds / SECONDS_PER_MINUTE,
        seconds % SECONDS_PER_MINUTE
    )
}
