//! End-to-end workflow tests: load, preview, commit, compare, export.

use std::io::Write as _;

use powertrace::{
    compare, export, loader, range, statistics, AnalysisSession, BatterySpec, Error, PowerSample,
    PowerSeries, TimeRange,
};
use uuid::Uuid;

fn constant_series(points: usize, power_w: f64, source: &str, mode: &str) -> PowerSeries {
    let samples = (0..points)
        .map(|t| PowerSample::new(t as f64, 3.7, power_w / 3.7, power_w))
        .collect();
    PowerSeries::build(samples, source, mode).unwrap()
}

#[test]
fn full_series_statistics_match_metadata_duration() {
    let series = constant_series(10, 0.05, "nolight.csv", "Nolight");
    let stats = statistics::compute(series.samples(), &BatterySpec::default()).unwrap();
    assert_eq!(stats.duration_s, series.metadata().total_duration_s);
}

#[test]
fn constant_power_scenario_end_to_end() {
    // time 0..=9 s, constant 0.05 W, default 1000 mAh / 3.7 V battery
    let series = constant_series(10, 0.05, "nolight.csv", "Nolight");
    let mut session = AnalysisSession::new(BatterySpec::default());
    session.load_series(series);

    let meta = *session.series().unwrap().metadata();
    let id = session
        .commit(meta.min_time_s, meta.max_time_s, Some("full run"))
        .unwrap();

    let stats = &session.results().get(&id).unwrap().statistics;
    assert!((stats.avg_power_mw - 50.0).abs() < 1e-9);
    assert!((stats.total_energy_j - 0.45).abs() < 1e-12);
    assert!((stats.battery_life.hours - 74.0).abs() < 1e-9);
}

#[test]
fn filter_count_matches_rows_in_range() {
    let series = constant_series(100, 0.05, "nolight.csv", "Nolight");
    let range = TimeRange::new(10.0, 42.0);
    range::validate_range(range, series.metadata()).unwrap();

    let rows = range::filter_range(&series, range).unwrap();
    let expected = series
        .samples()
        .iter()
        .filter(|s| s.time_s >= 10.0 && s.time_s <= 42.0)
        .count();
    assert_eq!(rows.len(), expected);
    assert_eq!(rows.len(), 33);
}

#[test]
fn reversed_range_reports_invalid_order_directly() {
    let series = constant_series(10, 0.05, "nolight.csv", "Nolight");
    let err = range::validate_range(TimeRange::new(5.0, 3.0), series.metadata()).unwrap_err();
    assert!(matches!(err, Error::InvalidOrder { .. }));
}

#[test]
fn full_span_range_is_always_valid() {
    for points in [2usize, 3, 10] {
        let series = constant_series(points, 0.05, "nolight.csv", "Nolight");
        let meta = series.metadata();
        let range = TimeRange::new(meta.min_time_s, meta.max_time_s);
        assert!(
            range::validate_range(range, meta).is_ok(),
            "full span rejected for {points}-point series"
        );
    }
}

#[test]
fn preview_is_idempotent() {
    let series = constant_series(10, 0.05, "nolight.csv", "Nolight");
    let mut session = AnalysisSession::new(BatterySpec::default());
    session.load_series(series);

    let first = session.preview(2.0, 8.0).unwrap();
    let second = session.preview(2.0, 8.0).unwrap();
    assert_eq!(first, second);
    assert_eq!(session.preview_cache().misses(), 1);
    assert_eq!(session.preview_cache().hits(), 1);
}

#[test]
fn zero_power_projects_infinite_battery_life() {
    let series = constant_series(10, 0.0, "idle.csv", "Nolight");
    let stats = statistics::compute(series.samples(), &BatterySpec::default()).unwrap();
    assert!(stats.battery_life.hours.is_infinite());
    assert!(stats.battery_life.hours.is_sign_positive());
}

#[test]
fn export_round_trips_field_by_field() {
    let mut session = AnalysisSession::new(BatterySpec::default());

    session.load_series(constant_series(10, 0.05, "nolight.csv", "Nolight"));
    session.commit(0.0, 9.0, Some("active")).unwrap();

    // A zero-power run exercises the infinite-projection encoding.
    session.load_series(constant_series(10, 0.0, "idle.csv", "Unknown"));
    session.commit(2.0, 8.0, Some("idle")).unwrap();

    let document = export::encode(session.results());
    let json = export::to_json(&document).unwrap();
    let decoded = export::from_json(&json).unwrap();
    assert_eq!(decoded, document);

    // Importing into a fresh session restores both results.
    let mut restored = AnalysisSession::new(BatterySpec::default());
    assert_eq!(restored.import_document(decoded), 2);
    assert_eq!(restored.results().len(), 2);
    let idle = restored.results().get_index(1).unwrap();
    assert!(idle.statistics.battery_life.hours.is_infinite());
}

#[test]
fn import_rejects_document_without_results_list() {
    let err = export::from_json(r#"{"version": 1}"#).unwrap_err();
    assert!(matches!(err, Error::Schema(ref msg) if msg.contains("results")));
}

#[test]
fn renaming_to_an_existing_label_fails_validation() {
    let mut session = AnalysisSession::new(BatterySpec::default());
    session.load_series(constant_series(10, 0.05, "nolight.csv", "Nolight"));
    session.commit(0.0, 9.0, Some("first")).unwrap();
    let second = session.commit(2.0, 8.0, Some("second")).unwrap();

    let err = session.results().validate_label("first").unwrap_err();
    assert!(matches!(err, Error::LabelInvalid(_)));

    // unique_label offers a name that is actually free.
    let suggestion = session.results().unique_label("first");
    assert_eq!(suggestion, "first (1)");
    assert!(session.results().validate_label(&suggestion).is_ok());
    assert!(session.results_mut().rename(&second, &suggestion));
}

#[test]
fn deleting_missing_id_leaves_count_unchanged() {
    let mut session = AnalysisSession::new(BatterySpec::default());
    session.load_series(constant_series(10, 0.05, "nolight.csv", "Nolight"));
    session.commit(0.0, 9.0, None).unwrap();

    assert!(!session.results_mut().delete(&Uuid::new_v4()));
    assert_eq!(session.results().len(), 1);
}

#[test]
fn comparison_over_committed_results() {
    let mut session = AnalysisSession::new(BatterySpec::default());

    session.load_series(constant_series(10, 0.04, "nolight.csv", "Nolight"));
    let low = session.commit(0.0, 9.0, Some("low")).unwrap();

    session.load_series(constant_series(10, 0.08, "flash.csv", "Flash"));
    let high = session.commit(0.0, 9.0, Some("high")).unwrap();

    let summary = compare::compare(session.results(), &[low, high]).unwrap();
    assert_eq!(summary.count, 2);
    assert!((summary.power_stats.min - 40.0).abs() < 1e-9);
    assert!((summary.power_stats.max - 80.0).abs() < 1e-9);
    assert_eq!(summary.modes, vec!["Flash".to_string(), "Nolight".to_string()]);

    let entries = compare::baseline_relative(session.results(), &[low, high]).unwrap();
    let high_entry = entries.iter().find(|e| e.id == high).unwrap();
    assert!((high_entry.power_increase_percent - 100.0).abs() < 1e-9);
}

#[test]
fn csv_files_load_through_the_session() {
    let mut file = tempfile::Builder::new()
        .prefix("breath_run")
        .suffix(".csv")
        .tempfile()
        .unwrap();
    writeln!(file, "Time,Voltage,Current,Power").unwrap();
    for t in 0..20 {
        writeln!(file, "{}.0,3.70,0.0150,0.0555", t).unwrap();
    }
    file.flush().unwrap();

    let mut session = AnalysisSession::new(BatterySpec::default());
    session.load_csv_file(file.path()).unwrap();

    let series = session.series().unwrap();
    assert_eq!(series.len(), 20);
    assert_eq!(series.mode_label(), "Breath");

    let preview = session.preview(5.0, 15.0).unwrap();
    assert_eq!(preview.data_points, 11);
    assert!((preview.stats.avg_power_mw - 55.5).abs() < 1e-9);
}

#[test]
fn loader_rejects_narrow_files() {
    let csv = "Time,Power\n0.0,0.05\n";
    let err = loader::load_csv_reader(csv.as_bytes(), "narrow.csv", "Unknown").unwrap_err();
    assert!(matches!(err, Error::MissingTimeColumn { found: 2 }));
}

#[test]
fn session_survives_core_errors() {
    let mut session = AnalysisSession::new(BatterySpec::default());
    session.load_series(constant_series(10, 0.05, "nolight.csv", "Nolight"));

    assert!(session.preview(5.0, 3.0).is_err());
    assert!(session.preview(-2.0, 5.0).is_err());
    assert!(session.commit(0.0, 9.0, Some("   ")).is_err());

    // After every failure the session keeps working.
    assert!(session.commit(0.0, 9.0, Some("recovered")).is_ok());
    assert_eq!(session.results().len(), 1);
}
