use chrono::{TimeZone, Utc};
use flownest_core::quotes::{
    carousel_fallback, fetch_with_fallback, GenerativeQuoteSource, Quote, QuoteCarousel,
    QuoteError, QuoteSource,
};
use flownest_core::{Dashboard, Priority, QuoteConfig};
use serde_json::Value;

struct FixedSource(Result<Vec<Quote>, u16>);

impl QuoteSource for FixedSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn fetch(&self) -> Result<Vec<Quote>, QuoteError> {
        match &self.0 {
            Ok(quotes) => Ok(quotes.clone()),
            Err(status) => Err(QuoteError::Status(*status)),
        }
    }
}

#[test]
fn export_file_carries_only_the_current_owner() {
    let mut dashboard = Dashboard::open_in_memory().unwrap();
    dashboard.add_task("guest only", Priority::Low).unwrap();
    dashboard
        .sign_up("eve@example.com", "abcdef", Some("Eve"))
        .unwrap();
    dashboard.add_task("write tests", Priority::High).unwrap();
    dashboard.add_habit("Yoga").unwrap();
    dashboard.save_reflection("good day").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let taken_at = Utc.with_ymd_and_hms(2024, 6, 5, 8, 30, 0).unwrap();
    let path = dashboard.export_to_dir(dir.path(), taken_at).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "flownest-data-2024-06-05.json"
    );

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["exportDate"], "2024-06-05T08:30:00.000Z");
    assert_eq!(json["userEmail"], "eve@example.com");
    assert_eq!(json["userId"], dashboard.owner_id().to_string());

    let todos = json["data"]["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["text"], "write tests");
    assert_eq!(json["data"]["habits"].as_array().unwrap().len(), 1);
    assert!(json["data"]["goals"].as_array().unwrap().is_empty());
    assert_eq!(json["data"]["reflections"].as_array().unwrap().len(), 1);
}

#[test]
fn guest_export_has_no_email() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let taken_at = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

    let export = dashboard.data_export(taken_at).unwrap();
    let json: Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
    assert_eq!(json["userEmail"], Value::Null);
    assert_eq!(json["userId"], "00000000-0000-0000-0000-000000000000");
}

#[test]
fn weekly_export_is_named_after_the_sunday() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let wednesday = Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).unwrap();

    let path = dashboard.export_weekly_to_dir(dir.path(), wednesday).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "flownest-weekly-summary-2024-06-02.json"
    );
    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["weekStarting"], "2024-06-02");
    assert_eq!(json["summary"]["goalsProgress"], 0);
}

#[test]
fn weekly_export_and_summary_agree_on_the_same_instant() {
    let dashboard = Dashboard::open_in_memory().unwrap();
    let task = dashboard.add_task("late finish", Priority::High).unwrap().unwrap();
    dashboard.toggle_task(task.id).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let saturday_night = Utc.with_ymd_and_hms(2024, 6, 8, 23, 59, 30).unwrap();

    let summary = dashboard
        .weekly_summary(saturday_night.date_naive())
        .unwrap();
    let path = dashboard
        .export_weekly_to_dir(dir.path(), saturday_night)
        .unwrap();

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["weekStarting"], "2024-06-02");
    assert_eq!(json["summary"], serde_json::to_value(&summary).unwrap());
}

#[test]
fn failed_fetch_falls_back_to_saved_quotes() {
    let batch = fetch_with_fallback(&FixedSource(Err(503)), carousel_fallback());

    assert!(batch.is_fallback());
    assert_eq!(batch.quotes, carousel_fallback());
    assert!(batch.error.unwrap().contains("503"));
}

#[test]
fn empty_fetch_also_falls_back() {
    let batch = fetch_with_fallback(&FixedSource(Ok(Vec::new())), carousel_fallback());

    assert!(batch.is_fallback());
    assert!(!batch.quotes.is_empty());
}

#[test]
fn fetched_quotes_feed_the_carousel() {
    let quotes = vec![
        Quote::new("Stay hungry.", "Steve Jobs"),
        Quote::new("Keep going.", "Unknown"),
    ];
    let batch = fetch_with_fallback(&FixedSource(Ok(quotes.clone())), carousel_fallback());
    assert!(!batch.is_fallback());

    let mut carousel = QuoteCarousel::from_batch(batch);
    assert_eq!(carousel.current(), &quotes[0]);
    assert_eq!(carousel.next(), &quotes[1]);
    assert_eq!(carousel.next(), &quotes[0]);
    assert_eq!(carousel.previous(), &quotes[1]);
}

#[test]
fn generative_source_without_key_falls_back_offline() {
    let source = GenerativeQuoteSource::new(&QuoteConfig::default()).unwrap();

    let batch = fetch_with_fallback(&source, carousel_fallback());
    assert!(batch.is_fallback());
    assert_eq!(batch.quotes, carousel_fallback());
}
