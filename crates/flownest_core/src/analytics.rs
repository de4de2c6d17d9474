//! Read-only aggregations for the analytics, profile and weekly views.
//!
//! Every function here is pure over already-loaded collections; dates are
//! interpreted in UTC.

use crate::model::goal::Goal;
use crate::model::habit::{Habit, DAYS_PER_WEEK, DAY_LABELS};
use crate::model::reflection::Reflection;
use crate::model::task::Task;
use crate::model::{Priority, RecordId};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

const RECENT_PER_COLLECTION: usize = 3;
const RECENT_TOTAL: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskBreakdown {
    pub completed: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekdayHabitCount {
    pub day: &'static str,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PriorityDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal_id: RecordId,
    pub title: String,
    pub progress: f64,
}

/// Bundle served by the analytics page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub tasks: TaskBreakdown,
    pub habits_by_weekday: Vec<WeekdayHabitCount>,
    pub priorities: PriorityDistribution,
    pub goals: Vec<GoalProgress>,
    pub reflection_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub tasks_completed: usize,
    pub tasks_pending: usize,
    pub habits_completed: usize,
    pub habits_total: usize,
    /// Average clamped goal progress, rounded to a whole percent.
    pub goals_progress: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Task,
    Goal,
    Reflection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub record_id: RecordId,
    pub title: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProfileStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_habits: usize,
    pub total_goals: usize,
    pub total_reflections: usize,
}

pub fn task_breakdown(tasks: &[Task]) -> TaskBreakdown {
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskBreakdown {
        completed,
        pending: tasks.len() - completed,
    }
}

/// Checked habits per weekday slot, Monday first.
pub fn habits_by_weekday(habits: &[Habit]) -> Vec<WeekdayHabitCount> {
    (0..DAYS_PER_WEEK)
        .map(|index| WeekdayHabitCount {
            day: DAY_LABELS[index],
            completed: habits.iter().filter(|habit| habit.days[index]).count(),
            total: habits.len(),
        })
        .collect()
}

pub fn priority_distribution(tasks: &[Task]) -> PriorityDistribution {
    tasks
        .iter()
        .fold(PriorityDistribution::default(), |mut acc, task| {
            match task.priority {
                Priority::High => acc.high += 1,
                Priority::Medium => acc.medium += 1,
                Priority::Low => acc.low += 1,
            }
            acc
        })
}

pub fn goal_progress(goals: &[Goal]) -> Vec<GoalProgress> {
    goals
        .iter()
        .map(|goal| GoalProgress {
            goal_id: goal.id,
            title: goal.title.clone(),
            progress: goal.progress_percentage(),
        })
        .collect()
}

pub fn analytics_report(
    tasks: &[Task],
    habits: &[Habit],
    goals: &[Goal],
    reflections: &[Reflection],
) -> AnalyticsReport {
    AnalyticsReport {
        tasks: task_breakdown(tasks),
        habits_by_weekday: habits_by_weekday(habits),
        priorities: priority_distribution(tasks),
        goals: goal_progress(goals),
        reflection_count: reflections.len(),
    }
}

/// Sunday that opens the week containing `today`.
pub fn start_of_week(today: NaiveDate) -> NaiveDate {
    let offset = u64::from(today.weekday().num_days_from_sunday());
    today.checked_sub_days(Days::new(offset)).unwrap_or(today)
}

/// Counts for the current week (tasks created since Sunday 00:00 UTC).
pub fn weekly_summary(
    tasks: &[Task],
    habits: &[Habit],
    goals: &[Goal],
    today: NaiveDate,
) -> WeeklySummary {
    let week_start_ms = start_of_week(today)
        .and_hms_opt(0, 0, 0)
        .map(|start| start.and_utc().timestamp_millis())
        .unwrap_or(i64::MIN);

    let this_week = tasks.iter().filter(|task| task.created_at >= week_start_ms);
    let (tasks_completed, tasks_pending) =
        this_week.fold((0, 0), |(done, open), task| {
            if task.completed {
                (done + 1, open)
            } else {
                (done, open + 1)
            }
        });

    let habits_total = habits.iter().map(|habit| habit.days.len()).sum();
    let habits_completed = habits.iter().map(Habit::completed_days).sum();

    let goals_progress = if goals.is_empty() {
        0
    } else {
        let total: f64 = goals.iter().map(Goal::progress_percentage).sum();
        (total / goals.len() as f64).round() as u32
    };

    WeeklySummary {
        tasks_completed,
        tasks_pending,
        habits_completed,
        habits_total,
        goals_progress,
    }
}

/// Latest three of each collection, merged, newest five overall.
pub fn recent_activity(
    tasks: &[Task],
    goals: &[Goal],
    reflections: &[Reflection],
) -> Vec<Activity> {
    let mut activities = Vec::new();
    activities.extend(latest(
        tasks.iter().map(|task| Activity {
            kind: ActivityKind::Task,
            record_id: task.id,
            title: task.text.clone(),
            timestamp: task.created_at,
        }),
    ));
    activities.extend(latest(goals.iter().map(|goal| Activity {
        kind: ActivityKind::Goal,
        record_id: goal.id,
        title: goal.title.clone(),
        timestamp: goal.created_at,
    })));
    activities.extend(latest(reflections.iter().map(|reflection| Activity {
        kind: ActivityKind::Reflection,
        record_id: reflection.id,
        title: reflection.heading().to_string(),
        timestamp: reflection.created_at,
    })));

    activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activities.truncate(RECENT_TOTAL);
    activities
}

pub fn profile_stats(
    tasks: &[Task],
    habits: &[Habit],
    goals: &[Goal],
    reflections: &[Reflection],
) -> ProfileStats {
    ProfileStats {
        total_tasks: tasks.len(),
        completed_tasks: tasks.iter().filter(|task| task.completed).count(),
        total_habits: habits.len(),
        total_goals: goals.len(),
        total_reflections: reflections.len(),
    }
}

fn latest(items: impl Iterator<Item = Activity>) -> Vec<Activity> {
    let mut items: Vec<Activity> = items.collect();
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(RECENT_PER_COLLECTION);
    items
}

#[cfg(test)]
mod tests {
    use super::{habits_by_weekday, priority_distribution, start_of_week, task_breakdown};
    use crate::model::habit::Habit;
    use crate::model::task::Task;
    use crate::model::{Priority, GUEST_OWNER_ID};
    use chrono::NaiveDate;

    #[test]
    fn start_of_week_is_previous_sunday() {
        // 2024-05-15 was a Wednesday.
        let wednesday = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert_eq!(
            start_of_week(wednesday),
            NaiveDate::from_ymd_opt(2024, 5, 12).unwrap()
        );
        let sunday = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        assert_eq!(start_of_week(sunday), sunday);
    }

    #[test]
    fn breakdown_and_priorities_count_every_task() {
        let mut done = Task::new(GUEST_OWNER_ID, "a", Priority::High);
        done.completed = true;
        let open = Task::new(GUEST_OWNER_ID, "b", Priority::Low);
        let tasks = vec![done, open];

        let breakdown = task_breakdown(&tasks);
        assert_eq!((breakdown.completed, breakdown.pending), (1, 1));
        let priorities = priority_distribution(&tasks);
        assert_eq!((priorities.high, priorities.medium, priorities.low), (1, 0, 1));
    }

    #[test]
    fn weekday_counts_are_per_slot() {
        let mut first = Habit::new(GUEST_OWNER_ID, "a");
        first.days[0] = true;
        let mut second = Habit::new(GUEST_OWNER_ID, "b");
        second.days[0] = true;
        second.days[6] = true;

        let counts = habits_by_weekday(&[first, second]);
        assert_eq!(counts.len(), 7);
        assert_eq!(counts[0].day, "Mon");
        assert_eq!(counts[0].completed, 2);
        assert_eq!(counts[6].completed, 1);
        assert_eq!(counts[3].total, 2);
    }
}
