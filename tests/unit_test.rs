mod helpers;

use cutoff_tracker::chart::{tick_label, tooltip_label, ChartSpec};
use cutoff_tracker::codec::{format_time, parse_time, TimeParseError};
use cutoff_tracker::config::{EmptySeriesPolicy, LogFormat};
use cutoff_tracker::models::{CutoffPoint, Series, Snapshot};
use cutoff_tracker::services::CutoffExtractor;
use cutoff_tracker::AppConfig;
use helpers::*;
use std::collections::HashMap;

/// Unit tests for the time codec
#[test]
fn test_parse_time_examples() {
    assert_eq!(parse_time("4:01.20").unwrap().seconds(), 241.20);
    assert_eq!(parse_time("#4:01.20").unwrap().seconds(), 241.20);
    assert_eq!(parse_time("38.5").unwrap().seconds(), 38.5);
    assert_eq!(parse_time("N/A").unwrap_err().to_string(), "Invalid seconds component: \"N/A\"");
    assert_eq!(parse_time("   "), Err(TimeParseError::Empty));
}

#[test]
fn test_format_time_examples() {
    assert_eq!(format_time(241.5), "4:01.50");
    assert_eq!(format_time(0.0), "0:00.00");
    assert_eq!(format_time(38.5), "0:38.50");
}

#[test]
fn test_formatted_time_parses_back_exactly() {
    for v in [0.0, 0.01, 7.45, 59.99, 60.0, 241.2, 241.5, 899.99, 1805.07] {
        let text = format_time(v);
        assert_eq!(parse_time(&text).unwrap().seconds(), v, "{} -> {}", v, text);
    }
}

/// Unit tests for cutoff extraction
#[test]
fn test_extractor_reads_rank_16() {
    let snapshot = Snapshot::new(
        date_of("2024-01-01"),
        vec![
            group_with_cutoff("800\nMen", 16, "1:49.80"),
            group_with_cutoff("Mile\nMen", 16, "4:01.20"),
        ],
    );

    let point = CutoffExtractor::default()
        .extract(&snapshot, "Mile", "Men")
        .unwrap()
        .unwrap();
    assert_eq!(point, CutoffPoint::new(date_of("2024-01-01"), parse_time("241.2").unwrap()));
}

#[test]
fn test_extractor_none_when_group_short_or_missing() {
    let snapshot = Snapshot::new(
        date_of("2024-01-01"),
        vec![short_group("Mile\nMen", 12)],
    );
    let extractor = CutoffExtractor::default();

    assert_eq!(extractor.extract(&snapshot, "Mile", "Men").unwrap(), None);
    assert_eq!(extractor.extract(&snapshot, "Mile", "Women").unwrap(), None);
    assert_eq!(extractor.extract(&snapshot, "3000", "Men").unwrap(), None);
}

#[test]
fn test_extractor_reports_unreadable_mark() {
    let snapshot = Snapshot::new(
        date_of("2024-01-01"),
        vec![group_with_cutoff("Mile\nMen", 16, "N/A")],
    );

    assert!(CutoffExtractor::default()
        .extract(&snapshot, "Mile", "Men")
        .is_err());
}

/// Unit tests for series and chart spec
#[test]
fn test_series_sorted_by_date() {
    let series = Series::new(
        "Mile",
        "Men",
        vec![
            CutoffPoint::new(date_of("2024-01-03"), parse_time("4:00.90").unwrap()),
            CutoffPoint::new(date_of("2024-01-01"), parse_time("4:01.20").unwrap()),
        ],
    );

    assert_eq!(series.labels(), vec!["2024-01-01", "2024-01-03"]);
    assert_eq!(series.values(), vec![241.2, 240.9]);
}

#[test]
fn test_chart_spec_labels_and_formatters() {
    let series = Series::new(
        "Mile",
        "Men",
        vec![CutoffPoint::new(date_of("2024-01-01"), parse_time("4:01.20").unwrap())],
    );
    let spec = ChartSpec::from_series(&series, 16);

    assert_eq!(spec.dataset_label, "16th Place Cutoff - Mile (Men)");
    assert_eq!(spec.x_axis_title, "Date");
    assert_eq!(spec.y_axis_title, "Time (MM:SS.ss)");
    assert_eq!(spec.tick(241.2), tick_label(241.2));
    assert_eq!(spec.tooltip(241.2), tooltip_label(241.2));
    assert_eq!(spec.tooltip(241.2), "Cutoff: 4:01.20");

    let (lo, hi) = spec.value_range();
    assert!(lo <= 241.2 && 241.2 <= hi);
}

/// Unit tests for configuration
#[test]
fn test_config_defaults() {
    let config = test_config(&[]);

    assert_eq!(config.source.location, "data");
    assert_eq!(config.source.index_file, "dates.json");
    assert_eq!(config.source.snapshot_file_name("2024-01-01"), "tfrrs_data (2024-01-01).json");
    assert_eq!(config.source.max_concurrent_fetches, 8);
    assert_eq!(config.cutoff_rank, 16);
    assert_eq!(config.empty_series_policy, EmptySeriesPolicy::Render);
    assert_eq!(config.log_format, LogFormat::Pretty);
    assert!(!config.source.is_remote());
}

#[test]
fn test_config_overrides_and_validation() {
    let config = test_config(&[
        ("DATA_SOURCE", "https://example.org/snapshots"),
        ("EMPTY_SERIES_POLICY", "fail"),
        ("LOG_FORMAT", "json"),
    ]);
    assert!(config.source.is_remote());
    assert_eq!(config.empty_series_policy, EmptySeriesPolicy::Fail);
    assert_eq!(config.log_format, LogFormat::Json);

    let bad: HashMap<&str, &str> = [("CUTOFF_RANK", "zero")].into_iter().collect();
    assert!(AppConfig::from_lookup(&|key: &str| bad.get(key).map(|v| v.to_string())).is_err());

    let bad: HashMap<&str, &str> = [("SNAPSHOT_FILE_TEMPLATE", "snapshot.json")].into_iter().collect();
    assert!(AppConfig::from_lookup(&|key: &str| bad.get(key).map(|v| v.to_string())).is_err());
}
