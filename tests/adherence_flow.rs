use chrono::NaiveDate;
use medminder::core::{init_logging, Config};
use medminder::features::reminders::{next_dose_time, time_until_next_dose};
use medminder::{
    probability_series, AdherenceEngine, Database, HistorySummary, PredictionContext,
    SessionIdentity,
};

#[tokio::test]
async fn predict_save_and_chart_with_sqlite() {
    init_logging("debug");

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        database_path: dir.path().join("medminder.db").to_string_lossy().to_string(),
        ..Config::default()
    };
    let weights = config.weights().unwrap();
    let engine = AdherenceEngine::new(Database::new(&config.database_path).await.unwrap());
    let identity = SessionIdentity::signed_in("patient-7");

    let risky = PredictionContext::from_form("night", "Friday", true, "10").unwrap();
    let safe = PredictionContext::from_form("morning", "Monday", false, "1").unwrap();

    let first = engine
        .predict_and_record(&identity, &risky, &weights)
        .await
        .unwrap();
    assert!(first.prediction.alert);
    assert!(first.prediction.alert_message().is_some());

    let second = engine
        .predict_and_record(&identity, &safe, &weights)
        .await
        .unwrap();
    assert!(!second.prediction.alert);

    let history = engine.history(&identity).await.unwrap();
    assert_eq!(probability_series(&history), vec![(0, 89.09), (1, 1.8)]);

    let summary = HistorySummary::from_entries(&history);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.alerts, 1);
    assert_eq!(summary.peak, 89.09);

    engine.clear_history(&identity).await.unwrap();
    engine.clear_history(&identity).await.unwrap();
    assert!(engine.history(&identity).await.unwrap().is_empty());
}

#[test]
fn next_dose_for_twice_daily_medication() {
    let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let noon = day.and_hms_opt(12, 0, 0).unwrap();
    let next_midnight = day.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap();

    assert_eq!(next_dose_time(2, day.and_hms_opt(0, 0, 0).unwrap()).unwrap(), noon);
    assert_eq!(next_dose_time(2, day.and_hms_opt(13, 0, 0).unwrap()).unwrap(), next_midnight);
    assert_eq!(
        time_until_next_dose(2, day.and_hms_opt(13, 0, 0).unwrap())
            .unwrap()
            .num_hours(),
        11
    );
    assert!(next_dose_time(0, noon).is_err());
}
