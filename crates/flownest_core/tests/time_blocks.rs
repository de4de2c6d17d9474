use chrono::NaiveDate;
use flownest_core::model::time_block::BlockColor;
use flownest_core::service::time_block_service::NewTimeBlock;
use flownest_core::service::ServiceError;
use flownest_core::{Dashboard, DashboardError, ValidationError};

fn block(title: &str, start: &str, end: &str) -> NewTimeBlock {
    NewTimeBlock {
        title: title.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        color: BlockColor::Green,
    }
}

#[test]
fn blocks_list_by_start_time() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    dashboard
        .add_time_block(today, block("Lunch", "12:00", "13:00"))
        .unwrap();
    dashboard
        .add_time_block(today, block("Deep work", "09:00", "11:30"))
        .unwrap();

    let blocks = dashboard.time_blocks_for(today).unwrap();
    let titles: Vec<&str> = blocks.iter().map(|block| block.title.as_str()).collect();
    assert_eq!(titles, vec!["Deep work", "Lunch"]);
    assert_eq!(blocks[0].display_range(), "9:00 AM - 11:30 AM");
    assert_eq!(blocks[0].color, BlockColor::Green);
}

#[test]
fn incomplete_form_is_a_no_op() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

    let added = dashboard
        .add_time_block(today, block("Focus", "", "10:00"))
        .unwrap();
    assert!(added.is_none());
    assert!(dashboard.time_blocks_for(today).unwrap().is_empty());
}

#[test]
fn end_must_come_after_start() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

    let err = dashboard
        .add_time_block(today, block("Backwards", "15:00", "14:00"))
        .unwrap_err();
    assert!(matches!(
        err,
        DashboardError::Service(ServiceError::Validation(ValidationError::EmptyTimeRange { .. }))
    ));

    let err = dashboard
        .add_time_block(today, block("Zero length", "15:00", "15:00"))
        .unwrap_err();
    assert!(matches!(
        err,
        DashboardError::Service(ServiceError::Validation(ValidationError::EmptyTimeRange { .. }))
    ));
    assert!(dashboard.time_blocks_for(today).unwrap().is_empty());
}

#[test]
fn blocks_from_earlier_days_are_purged_on_read() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let yesterday = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

    dashboard
        .add_time_block(yesterday, block("Old", "08:00", "09:00"))
        .unwrap();
    assert_eq!(dashboard.time_blocks_for(yesterday).unwrap().len(), 1);

    assert!(dashboard.time_blocks_for(today).unwrap().is_empty());
    assert!(dashboard.time_blocks_for(yesterday).unwrap().is_empty());
}

#[test]
fn deleted_block_is_gone() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let created = dashboard
        .add_time_block(today, block("Gym", "18:00", "19:00"))
        .unwrap()
        .unwrap();

    dashboard.delete_time_block(today, created.id).unwrap();
    assert!(dashboard.time_blocks_for(today).unwrap().is_empty());
}
