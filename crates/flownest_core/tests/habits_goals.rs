use flownest_core::model::goal::{GoalType, ProgressBand};
use flownest_core::service::goal_service::{GoalUpdate, NewGoal};
use flownest_core::service::ServiceError;
use flownest_core::{Dashboard, DashboardError, ValidationError};

#[test]
fn new_habit_starts_with_an_empty_week() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let habit = dashboard.add_habit("Read 20 pages").unwrap().unwrap();

    assert_eq!(habit.days, [false; 7]);
    assert!(dashboard.add_habit("  ").unwrap().is_none());
}

#[test]
fn toggling_a_day_flips_only_that_cell() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let habit = dashboard.add_habit("Meditate").unwrap().unwrap();

    dashboard.toggle_habit_day(habit.id, 2).unwrap();
    let stored = &dashboard.list_habits().unwrap()[0];
    assert_eq!(
        stored.days,
        [false, false, true, false, false, false, false]
    );

    let cleared = dashboard.toggle_habit_day(habit.id, 2).unwrap();
    assert_eq!(cleared.days, [false; 7]);
}

#[test]
fn toggling_outside_the_week_is_rejected() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let habit = dashboard.add_habit("Walk").unwrap().unwrap();

    let err = dashboard.toggle_habit_day(habit.id, 7).unwrap_err();
    assert!(matches!(
        err,
        DashboardError::Service(ServiceError::Validation(ValidationError::DayIndexOutOfRange(7)))
    ));
    assert_eq!(dashboard.list_habits().unwrap()[0].days, [false; 7]);
}

#[test]
fn renaming_and_deleting_habits() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let habit = dashboard.add_habit("Jog").unwrap().unwrap();

    let renamed = dashboard.rename_habit(habit.id, "  Run 5k ").unwrap();
    assert_eq!(renamed.name, "Run 5k");

    dashboard.delete_habit(habit.id).unwrap();
    assert!(dashboard.list_habits().unwrap().is_empty());
}

#[test]
fn goal_progress_is_clamped_for_display_only() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let goal = dashboard
        .add_goal(NewGoal {
            title: "Run 20 km".to_string(),
            target_value: 20.0,
            ..NewGoal::default()
        })
        .unwrap()
        .unwrap();
    assert_eq!(goal.progress_percentage(), 0.0);

    let half = dashboard.set_goal_progress(goal.id, 10.0).unwrap();
    assert_eq!(half.progress_percentage(), 50.0);

    let over = dashboard.set_goal_progress(goal.id, 35.0).unwrap();
    assert_eq!(over.current_value, 35.0);
    assert_eq!(over.progress_percentage(), 100.0);
    assert_eq!(over.progress_band(), ProgressBand::for_percentage(100.0));

    let under = dashboard.set_goal_progress(goal.id, -5.0).unwrap();
    assert_eq!(under.progress_percentage(), 0.0);
}

#[test]
fn zero_target_reports_zero_progress() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let goal = dashboard
        .add_goal(NewGoal {
            title: "Undefined target".to_string(),
            target_value: 0.0,
            current_value: 5.0,
            ..NewGoal::default()
        })
        .unwrap()
        .unwrap();

    assert_eq!(goal.progress_percentage(), 0.0);
}

#[test]
fn goal_defaults_and_edits() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let goal = dashboard
        .add_goal(NewGoal {
            title: "Ship feature".to_string(),
            category: "   ".to_string(),
            ..NewGoal::default()
        })
        .unwrap()
        .unwrap();
    assert_eq!(goal.target_value, 100.0);
    assert_eq!(goal.category, "personal");
    assert_eq!(goal.goal_type, GoalType::Weekly);

    let edited = dashboard
        .update_goal(
            goal.id,
            GoalUpdate {
                goal_type: Some(GoalType::Monthly),
                category: Some("work".to_string()),
                ..GoalUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(edited.goal_type, GoalType::Monthly);
    assert_eq!(edited.category, "work");
    assert_eq!(dashboard.list_goals().unwrap(), vec![edited]);
}

#[test]
fn non_finite_progress_is_rejected() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let goal = dashboard
        .add_goal(NewGoal {
            title: "Save money".to_string(),
            ..NewGoal::default()
        })
        .unwrap()
        .unwrap();

    let err = dashboard.set_goal_progress(goal.id, f64::NAN).unwrap_err();
    assert!(matches!(
        err,
        DashboardError::Service(ServiceError::Validation(ValidationError::NonFiniteNumber(_)))
    ));
}
