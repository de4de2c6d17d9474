use chrono::NaiveDate;
use flownest_core::model::time_block::BlockColor;
use flownest_core::service::time_block_service::NewTimeBlock;
use flownest_core::{Dashboard, Priority, SnapshotView};
use std::time::Duration;

#[test]
fn subscription_delivers_initial_snapshot_then_each_write() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    dashboard.add_task("existing", Priority::Medium).unwrap();

    let subscription = dashboard.subscribe_tasks().unwrap();
    let initial = subscription.try_next().unwrap();
    assert_eq!(initial.items.len(), 1);

    let task = dashboard.add_task("fresh", Priority::High).unwrap().unwrap();
    dashboard.toggle_task(task.id).unwrap();

    let pushed = subscription.drain();
    assert_eq!(pushed.len(), 2);
    assert_eq!(pushed[0].items.len(), 2);
    assert!(pushed[1].items.iter().any(|item| item.id == task.id && item.completed));
    assert!(pushed[0].revision > initial.revision);
    assert!(pushed[1].revision > pushed[0].revision);
}

#[test]
fn stale_snapshot_cannot_resurrect_a_deleted_record() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let subscription = dashboard.subscribe_habits().unwrap();
    let habit = dashboard.add_habit("Floss").unwrap().unwrap();
    dashboard.delete_habit(habit.id).unwrap();

    let snapshots = subscription.drain();
    assert_eq!(snapshots.len(), 3);

    let mut view = SnapshotView::new();
    assert!(view.apply(snapshots[2].clone()));
    assert!(view.items().is_empty());

    assert!(!view.apply(snapshots[1].clone()));
    assert!(!view.apply(snapshots[0].clone()));
    assert!(view.items().is_empty());
    assert_eq!(view.revision(), Some(snapshots[2].revision));
}

#[test]
fn empty_form_does_not_publish() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let subscription = dashboard.subscribe_goals().unwrap();
    subscription.try_next().unwrap();

    assert!(dashboard.save_reflection("   ").unwrap().is_none());
    assert!(dashboard.add_habit("").unwrap().is_none());

    assert!(subscription
        .next_timeout(Duration::from_millis(20))
        .is_none());
}

#[test]
fn subscribers_only_see_their_own_owner() {
    let mut dashboard = Dashboard::open_in_memory().unwrap();
    let guest_feed = dashboard.subscribe_reflections().unwrap();
    guest_feed.try_next().unwrap();

    dashboard.sign_up("lin@example.com", "hunter22", None).unwrap();
    dashboard.save_reflection("signed-in thought").unwrap();

    assert!(guest_feed.try_next().is_none());
}

#[test]
fn time_block_feed_tracks_today() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let subscription = dashboard.subscribe_time_blocks(today).unwrap();
    subscription.try_next().unwrap();

    dashboard
        .add_time_block(
            today,
            NewTimeBlock {
                title: "Plan".to_string(),
                start_time: "08:00".to_string(),
                end_time: "08:30".to_string(),
                color: BlockColor::Purple,
            },
        )
        .unwrap();

    let snapshot = subscription.try_next().unwrap();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].title, "Plan");
}

#[test]
fn purging_yesterdays_blocks_publishes_an_empty_snapshot() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let yesterday = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    dashboard
        .add_time_block(
            yesterday,
            NewTimeBlock {
                title: "Review".to_string(),
                start_time: "17:00".to_string(),
                end_time: "18:00".to_string(),
                color: BlockColor::Blue,
            },
        )
        .unwrap();
    let subscription = dashboard.subscribe_time_blocks(yesterday).unwrap();
    assert_eq!(subscription.try_next().unwrap().items.len(), 1);

    assert!(dashboard.time_blocks_for(today).unwrap().is_empty());

    let snapshot = subscription.try_next().unwrap();
    assert!(snapshot.items.is_empty());

    dashboard.time_blocks_for(today).unwrap();
    assert!(subscription.try_next().is_none());
}
