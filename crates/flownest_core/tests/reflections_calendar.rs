use chrono::{NaiveDate, NaiveTime};
use flownest_core::model::reflection::Mood;
use flownest_core::service::calendar_service::NewEvent;
use flownest_core::service::reflection_service::NewWeeklyReflection;
use flownest_core::service::task_service::NewTask;
use flownest_core::service::ServiceError;
use flownest_core::{Dashboard, DashboardError, Priority, ValidationError};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn reflections_ignore_blank_text_and_keep_five_recent() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    assert!(dashboard.save_reflection("\n  ").unwrap().is_none());

    for index in 0..7 {
        dashboard
            .save_reflection(&format!("entry {index}"))
            .unwrap()
            .unwrap();
    }

    assert_eq!(dashboard.list_reflections().unwrap().len(), 7);
    assert_eq!(dashboard.recent_reflections().unwrap().len(), 5);
}

#[test]
fn deleted_reflection_is_gone() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let reflection = dashboard
        .save_reflection("grateful for sunshine")
        .unwrap()
        .unwrap();
    assert!(reflection.date().is_some());

    dashboard.delete_reflection(reflection.id).unwrap();
    assert!(dashboard.list_reflections().unwrap().is_empty());
}

#[test]
fn event_time_is_optional_but_must_parse() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let day = date(2024, 6, 3);

    let mut timed = NewEvent::new("Standup", day);
    timed.due_time = Some("09:30".to_string());
    let event = dashboard.add_event(timed).unwrap().unwrap();
    assert_eq!(event.due_time, NaiveTime::from_hms_opt(9, 30, 0));

    let all_day = dashboard.add_event(NewEvent::new("Holiday", day)).unwrap().unwrap();
    assert_eq!(all_day.due_time, None);

    let mut broken = NewEvent::new("Late", day);
    broken.due_time = Some("25:00".to_string());
    let err = dashboard.add_event(broken).unwrap_err();
    assert!(matches!(
        err,
        DashboardError::Service(ServiceError::Validation(ValidationError::InvalidClockTime(_)))
    ));
    assert_eq!(dashboard.list_events().unwrap().len(), 2);
}

#[test]
fn agenda_collects_tasks_habits_and_events_for_one_day() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let monday = date(2024, 6, 3);

    let mut due_task = NewTask::new("Submit report", Priority::High);
    due_task.due_date = Some(monday);
    dashboard.create_task(due_task).unwrap();
    dashboard.add_task("Someday", Priority::Low).unwrap();

    let checked = dashboard.add_habit("Gym").unwrap().unwrap();
    dashboard.toggle_habit_day(checked.id, 0).unwrap();
    dashboard.add_habit("Unchecked").unwrap();

    dashboard.add_event(NewEvent::new("Dentist", monday)).unwrap();
    dashboard
        .add_event(NewEvent::new("Other day", date(2024, 6, 4)))
        .unwrap();

    let agenda = dashboard.agenda(monday).unwrap();
    assert_eq!(agenda.date, monday);
    assert_eq!(agenda.tasks.len(), 1);
    assert_eq!(agenda.tasks[0].text, "Submit report");
    assert_eq!(agenda.habits.len(), 1);
    assert_eq!(agenda.habits[0].name, "Gym");
    assert_eq!(agenda.events.len(), 1);
    assert_eq!(agenda.events[0].title, "Dentist");
}

#[test]
fn month_overview_has_one_marker_per_day() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    dashboard
        .add_event(NewEvent::new("Launch", date(2024, 6, 15)))
        .unwrap();
    dashboard
        .add_event(NewEvent::new("Next month", date(2024, 7, 1)))
        .unwrap();

    let markers = dashboard.month_overview(2024, 6).unwrap();
    assert_eq!(markers.len(), 30);
    assert_eq!(markers[0].date, date(2024, 6, 1));
    assert_eq!(markers[14].event_count, 1);
    assert_eq!(
        markers.iter().map(|marker| marker.event_count).sum::<usize>(),
        1
    );

    assert_eq!(dashboard.events_in_month(2024, 6).unwrap().len(), 1);
    assert!(dashboard.month_overview(2024, 13).is_err());
}

#[test]
fn deleting_an_event_removes_it_from_the_month() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let event = dashboard
        .add_event(NewEvent::new("Review", date(2024, 2, 29)))
        .unwrap()
        .unwrap();

    dashboard.delete_event(event.id).unwrap();
    assert!(dashboard.events_in_month(2024, 2).unwrap().is_empty());
}

#[test]
fn weekly_reflection_keeps_title_and_mood() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let skipped = dashboard
        .save_weekly_reflection(NewWeeklyReflection {
            title: "  ".to_string(),
            text: "no title".to_string(),
            mood: Mood::Happy,
        })
        .unwrap();
    assert!(skipped.is_none());

    dashboard.save_reflection("quick note").unwrap();
    let saved = dashboard
        .save_weekly_reflection(NewWeeklyReflection {
            title: " Week 23 ".to_string(),
            text: "Long week, shipped the release.".to_string(),
            mood: Mood::Tired,
        })
        .unwrap()
        .unwrap();
    assert_eq!(saved.title.as_deref(), Some("Week 23"));

    let listed = dashboard.list_reflections().unwrap();
    assert_eq!(listed.len(), 2);
    let weekly = listed.iter().find(|item| item.id == saved.id).unwrap();
    assert_eq!(weekly.mood, Mood::Tired);
    assert_eq!(weekly.heading(), "Week 23");
    let plain = listed.iter().find(|item| item.id != saved.id).unwrap();
    assert_eq!(plain.title, None);
    assert_eq!(plain.mood, Mood::Neutral);
}

#[test]
fn current_mood_is_remembered_and_survives_reset() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let preferences = dashboard.preferences();
    assert_eq!(preferences.current_mood().unwrap(), Mood::Neutral);

    preferences.set_current_mood(Mood::Excited).unwrap();
    preferences.reset_settings().unwrap();
    assert_eq!(preferences.current_mood().unwrap(), Mood::Excited);
}
