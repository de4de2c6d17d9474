use chrono::NaiveDate;
use flownest_core::preferences::{PomodoroSettings, PreferenceError, Widget, KEY_POMODORO, KEY_WIDGETS};
use flownest_core::{AuthError, Dashboard, DashboardError, Priority};

#[test]
fn dark_mode_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flownest.sqlite3");

    let dashboard = Dashboard::open_path(&path).unwrap();
    assert!(!dashboard.preferences().dark_mode(false).unwrap());
    assert!(dashboard.preferences().toggle_dark_mode(false).unwrap());
    drop(dashboard);

    let reopened = Dashboard::open_path(&path).unwrap();
    assert!(reopened.preferences().dark_mode(false).unwrap());
}

#[test]
fn corrupt_widget_value_falls_back_to_defaults() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    dashboard
        .connection()
        .execute(
            "INSERT INTO preferences (key, value) VALUES (?1, 'not json');",
            [KEY_WIDGETS],
        )
        .unwrap();

    let widgets = dashboard.preferences().widgets().unwrap();
    assert!(widgets.todo && widgets.pomodoro && widgets.habit);

    let toggled = dashboard.preferences().toggle_widget(Widget::Habit).unwrap();
    assert!(!toggled.is_visible(Widget::Habit));
    assert!(toggled.is_visible(Widget::Todo));
}

#[test]
fn out_of_range_timer_settings_are_rejected_and_ignored() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let preferences = dashboard.preferences();

    let err = preferences
        .set_pomodoro_settings(PomodoroSettings {
            work_duration: 0,
            short_break_duration: 5,
            long_break_duration: 15,
        })
        .unwrap_err();
    assert!(matches!(err, PreferenceError::Validation(_)));

    dashboard
        .connection()
        .execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2);",
            [
                KEY_POMODORO,
                r#"{"workDuration":90,"shortBreakDuration":5,"longBreakDuration":15}"#,
            ],
        )
        .unwrap();
    assert_eq!(
        preferences.pomodoro_settings().unwrap(),
        PomodoroSettings::default()
    );
}

#[test]
fn reset_restores_defaults_but_keeps_dark_mode() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let preferences = dashboard.preferences();
    preferences.set_dark_mode(true).unwrap();
    preferences
        .set_pomodoro_settings(PomodoroSettings {
            work_duration: 50,
            short_break_duration: 10,
            long_break_duration: 30,
        })
        .unwrap();
    preferences.toggle_widget(Widget::Pomodoro).unwrap();

    preferences.reset_settings().unwrap();

    assert_eq!(
        preferences.pomodoro_settings().unwrap(),
        PomodoroSettings::default()
    );
    assert!(preferences.widgets().unwrap().pomodoro);
    assert!(preferences.dark_mode(false).unwrap());
}

#[test]
fn daily_motivation_is_stable_within_a_day() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let preferences = dashboard.preferences();
    let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

    let first = preferences.daily_motivation(day).unwrap();
    assert_eq!(preferences.daily_motivation(day).unwrap(), first);

    let refreshed = preferences.refresh_motivation(day).unwrap();
    assert_ne!(refreshed, first);
    assert_eq!(preferences.daily_motivation(day).unwrap(), refreshed);
}

#[test]
fn sign_up_then_sign_in_with_the_same_password() {
    let mut dashboard = Dashboard::open_in_memory().unwrap();
    let created = dashboard
        .sign_up("Grace@Example.com", "correct horse", Some("Grace"))
        .unwrap();
    assert_eq!(created.email, "Grace@Example.com");
    assert_eq!(created.label(), "Grace");
    assert!(!dashboard.session().is_guest());

    dashboard.sign_out().unwrap();
    assert!(dashboard.session().is_guest());

    let signed_in = dashboard.sign_in("grace@example.com", "correct horse").unwrap();
    assert_eq!(signed_in.owner_id, created.owner_id);
    assert_eq!(dashboard.owner_id(), created.owner_id);
}

#[test]
fn duplicate_email_and_bad_passwords_are_rejected() {
    let mut dashboard = Dashboard::open_in_memory().unwrap();
    dashboard.sign_up("sam@example.com", "abcdef", None).unwrap();

    let err = dashboard.sign_up("SAM@example.com", "abcdef", None).unwrap_err();
    assert!(matches!(err, DashboardError::Auth(AuthError::EmailTaken)));

    let err = dashboard.sign_up("new@example.com", "abc", None).unwrap_err();
    assert!(matches!(
        err,
        DashboardError::Auth(AuthError::WeakPassword { .. })
    ));

    let err = dashboard.sign_up("not-an-email", "abcdef", None).unwrap_err();
    assert!(matches!(err, DashboardError::Auth(AuthError::InvalidEmail)));

    let err = dashboard.sign_in("sam@example.com", "wrong!").unwrap_err();
    assert!(matches!(err, DashboardError::Auth(AuthError::InvalidCredentials)));

    let err = dashboard.sign_in("nobody@example.com", "abcdef").unwrap_err();
    assert!(matches!(err, DashboardError::Auth(AuthError::InvalidCredentials)));
}

#[test]
fn session_is_restored_when_the_store_is_reopened() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flownest.sqlite3");

    let mut dashboard = Dashboard::open_path(&path).unwrap();
    let identity = dashboard.sign_up("kim@example.com", "pa55word", None).unwrap();
    dashboard.add_task("account task", Priority::Low).unwrap();
    drop(dashboard);

    let reopened = Dashboard::open_path(&path).unwrap();
    assert_eq!(reopened.owner_id(), identity.owner_id);
    assert_eq!(reopened.list_tasks().unwrap().len(), 1);
}

#[test]
fn guests_cannot_rename_an_account() {
    let mut dashboard = Dashboard::open_in_memory().unwrap();

    let err = dashboard.update_display_name("Nobody").unwrap_err();
    assert!(matches!(err, DashboardError::Auth(AuthError::NotSignedIn)));

    dashboard.sign_up("ray@example.com", "abcdef", None).unwrap();
    assert_eq!(dashboard.session().identity().unwrap().label(), "ray");
    let renamed = dashboard.update_display_name("Ray").unwrap();
    assert_eq!(renamed.label(), "Ray");
}
