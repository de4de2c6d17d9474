//! Focus score derived from task and habit completion.
//!
//! # Invariants
//! - Score is `round(task ratio * 50) + round(habit-day ratio * 50)`,
//!   clamped to `0..=100`.
//! - An empty collection contributes 0 to its half.
//! - Nothing is stored; callers recompute from the latest snapshots.

use crate::model::habit::Habit;
use crate::model::task::Task;
use serde::Serialize;

const HALF_WEIGHT: f64 = 50.0;
const STREAK_WINDOW_DAYS: i64 = 7;
const STREAK_CAP: u32 = 7;
const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl ScoreLabel {
    pub fn for_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::NeedsWork,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsWork => "Needs Work",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "You're crushing it!",
            Self::Good => "Great progress! Keep it up!",
            Self::Fair => "You're getting there!",
            Self::NeedsWork => "Every step counts!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FocusScore {
    pub score: u8,
    pub task_points: u8,
    pub habit_points: u8,
    /// Tasks completed in the last seven days, capped at seven.
    pub streak: u32,
    pub label: ScoreLabel,
}

/// Computes the focus score at `now_ms` (Unix epoch milliseconds).
pub fn focus_score(tasks: &[Task], habits: &[Habit], now_ms: i64) -> FocusScore {
    let completed_tasks = tasks.iter().filter(|task| task.completed).count();
    let task_points = weighted_ratio(completed_tasks, tasks.len());

    let total_days: usize = habits.iter().map(|habit| habit.days.len()).sum();
    let completed_days: usize = habits.iter().map(Habit::completed_days).sum();
    let habit_points = weighted_ratio(completed_days, total_days);

    let score = (u16::from(task_points) + u16::from(habit_points)).min(100) as u8;

    FocusScore {
        score,
        task_points,
        habit_points,
        streak: completion_streak(tasks, now_ms),
        label: ScoreLabel::for_score(score),
    }
}

/// Completed tasks whose completion (or creation, when unknown) falls within
/// the last seven whole days.
pub fn completion_streak(tasks: &[Task], now_ms: i64) -> u32 {
    let recent = tasks
        .iter()
        .filter(|task| task.completed)
        .filter(|task| {
            let at = task.completed_at.unwrap_or(task.created_at);
            let days_ago = (now_ms - at).div_euclid(MS_PER_DAY);
            days_ago <= STREAK_WINDOW_DAYS
        })
        .count();
    (recent as u32).min(STREAK_CAP)
}

fn weighted_ratio(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let points = (done as f64 / total as f64 * HALF_WEIGHT).round();
    points.clamp(0.0, HALF_WEIGHT) as u8
}
