use chrono::Utc;
use flownest_core::analytics::ActivityKind;
use flownest_core::model::now_epoch_ms;
use flownest_core::service::goal_service::NewGoal;
use flownest_core::{Dashboard, Priority, ScoreLabel};

#[test]
fn empty_dashboard_scores_zero() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let score = dashboard.focus_score(now_epoch_ms()).unwrap();

    assert_eq!(score.score, 0);
    assert_eq!(score.streak, 0);
    assert_eq!(score.label, ScoreLabel::for_score(0));
}

#[test]
fn finishing_everything_scores_one_hundred() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let task = dashboard.add_task("only task", Priority::High).unwrap().unwrap();
    dashboard.toggle_task(task.id).unwrap();
    let habit = dashboard.add_habit("Daily").unwrap().unwrap();
    for day in 0..7 {
        dashboard.toggle_habit_day(habit.id, day).unwrap();
    }

    let score = dashboard.focus_score(now_epoch_ms()).unwrap();
    assert_eq!(score.score, 100);
    assert_eq!(score.streak, 1);
    assert_eq!(score.label, ScoreLabel::for_score(100));
}

#[test]
fn analytics_break_down_tasks_priorities_and_habits() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let done = dashboard.add_task("a", Priority::High).unwrap().unwrap();
    dashboard.add_task("b", Priority::High).unwrap();
    dashboard.add_task("c", Priority::Low).unwrap();
    dashboard.toggle_task(done.id).unwrap();
    let habit = dashboard.add_habit("Read").unwrap().unwrap();
    dashboard.toggle_habit_day(habit.id, 4).unwrap();
    dashboard.save_reflection("calm").unwrap();

    let report = dashboard.analytics().unwrap();
    assert_eq!(report.tasks.completed, 1);
    assert_eq!(report.tasks.pending, 2);
    assert_eq!(report.priorities.high, 2);
    assert_eq!(report.priorities.medium, 0);
    assert_eq!(report.priorities.low, 1);
    assert_eq!(report.habits_by_weekday.len(), 7);
    assert_eq!(report.habits_by_weekday[4].day, "Fri");
    assert_eq!(report.habits_by_weekday[4].completed, 1);
    assert_eq!(report.habits_by_weekday[0].completed, 0);
    assert_eq!(report.reflection_count, 1);
}

#[test]
fn weekly_summary_averages_goal_progress() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    for (title, current) in [("half", 50.0), ("full", 150.0)] {
        dashboard
            .add_goal(NewGoal {
                title: title.to_string(),
                current_value: current,
                ..NewGoal::default()
            })
            .unwrap();
    }
    let task = dashboard.add_task("fresh", Priority::Medium).unwrap().unwrap();
    dashboard.toggle_task(task.id).unwrap();
    dashboard.add_task("open", Priority::Medium).unwrap();

    let summary = dashboard.weekly_summary(Utc::now().date_naive()).unwrap();
    assert_eq!(summary.goals_progress, 75);
    assert_eq!(summary.tasks_completed, 1);
    assert_eq!(summary.tasks_pending, 1);
    assert_eq!(summary.habits_total, 0);
}

#[test]
fn recent_activity_and_profile_totals() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    for index in 0..4 {
        dashboard
            .add_task(&format!("task {index}"), Priority::Medium)
            .unwrap();
    }
    dashboard
        .add_goal(NewGoal {
            title: "goal".to_string(),
            ..NewGoal::default()
        })
        .unwrap();
    dashboard.save_reflection("note").unwrap();
    dashboard.add_habit("habit").unwrap();

    let activity = dashboard.recent_activity().unwrap();
    assert_eq!(activity.len(), 5);
    assert!(activity.iter().any(|item| item.kind == ActivityKind::Goal));
    assert!(activity.iter().any(|item| item.kind == ActivityKind::Reflection));
    assert_eq!(
        activity
            .iter()
            .filter(|item| item.kind == ActivityKind::Task)
            .count(),
        3
    );

    let stats = dashboard.profile_stats().unwrap();
    assert_eq!(stats.total_tasks, 4);
    assert_eq!(stats.completed_tasks, 0);
    assert_eq!(stats.total_habits, 1);
    assert_eq!(stats.total_goals, 1);
    assert_eq!(stats.total_reflections, 1);
}
