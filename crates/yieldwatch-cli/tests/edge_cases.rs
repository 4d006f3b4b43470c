//! Edge case integration tests for yieldwatch-cli.
//!
//! Covers configuration boundaries, the documented engine properties on
//! crafted herds, and end-to-end determinism of seeded runs.

use std::io::Write;

use serde_json::Value;

use yieldwatch::*;
use yieldwatch_cli::config::{load_config, ConfigError, ConfigOverrides, CONFIG_ENV};
use yieldwatch_cli::pipeline::{execute, Operation};
use yieldwatch_cli::report::{ConsoleReport, JsonReport};
use yieldwatch_cli::sensor::{build_herd, SensorSimulator};
use yieldwatch_cli::SimulationConfig;

// ─────────────────────── helpers ───────────────────────

/// Write `body` to a config file inside `dir` and return its path.
fn write_config(dir: &tempfile::TempDir, body: &str) -> String {
    let path = dir.path().join("config.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path.to_str().unwrap().to_string()
}

/// Herd of `n` subjects with the given quantities per subject.
fn herd(rows: &[&[i64]]) -> SubjectReadings {
    rows.iter()
        .enumerate()
        .map(|(i, q)| {
            (
                Subject::new(format!("{:02}", i + 1), format!("Cow {}", i + 1)),
                series_of(q),
            )
        })
        .collect()
}

/// Full seeded run rendered as JSON.
fn json_run(config: &SimulationConfig) -> Value {
    let mut sensor = SensorSimulator::from_config(config);
    let readings = build_herd(config, &mut sensor);
    let report = JsonReport::new();
    {
        let engine = OperationsEngine::with_sink(&report);
        execute(&engine, &readings, config, &Operation::All).unwrap();
    }
    report.into_value()
}

// ═══════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════

#[test]
fn test_01_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"{"subjects": 3, "readings_per_subject": 4, "pattern": [19, 21], "seed": 11}"#,
    );

    let config = load_config(Some(&path), &ConfigOverrides::default()).unwrap();
    assert_eq!(config.subjects, 3);
    assert_eq!(config.readings_per_subject, 4);
    assert_eq!(config.pattern, vec![19, 21]);
    assert_eq!(config.seed, Some(11));
    assert_eq!(config.threshold, 20.0);
}

#[test]
fn test_02_overrides_beat_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, r#"{"subjects": 3, "threshold": 18.0}"#);
    let overrides = ConfigOverrides {
        subjects: Some(5),
        threshold: Some(22.5),
        ..ConfigOverrides::default()
    };

    let config = load_config(Some(&path), &overrides).unwrap();
    assert_eq!(config.subjects, 5);
    assert_eq!(config.threshold, 22.5);
}

#[test]
fn test_03_negative_count_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, r#"{"readings_per_subject": -3}"#);
    let err = load_config(Some(&path), &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_04_zero_count_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, r#"{"subjects": 0}"#);
    let err = load_config(Some(&path), &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_05_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = load_config(path.to_str(), &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_06_env_var_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, r#"{"subjects": 2}"#);
    std::env::set_var(CONFIG_ENV, &path);
    let config = load_config(None, &ConfigOverrides::default());
    std::env::remove_var(CONFIG_ENV);
    assert_eq!(config.unwrap().subjects, 2);
}

// ═══════════════════════════════════════════════════════
// ENGINE PROPERTIES ON CRAFTED HERDS
// ═══════════════════════════════════════════════════════

#[test]
fn test_07_pattern_examples() {
    let engine = OperationsEngine::new();
    let readings = herd(&[&[18, 19, 20, 21]]);
    assert!(engine.pattern_exists(&readings, &series_of(&[19, 20])).unwrap());
    assert!(!engine.pattern_exists(&readings, &series_of(&[20, 19])).unwrap());

    let short = herd(&[&[18]]);
    assert!(!engine.pattern_exists(&short, &series_of(&[18, 19])).unwrap());
}

#[test]
fn test_08_classification_boundary() {
    let engine = OperationsEngine::new();
    let readings = herd(&[&[20, 20, 20]]);

    let at = engine.classify(&readings, 20.0).unwrap();
    assert_eq!(at.high.len(), 1);
    let above = engine.classify(&readings, 21.0).unwrap();
    assert_eq!(above.low.len(), 1);
    assert!(!engine.classify_by_average(&readings, 21.0).unwrap());
}

#[test]
fn test_09_ten_subjects_three_high() {
    let readings = herd(&[
        &[18, 19],
        &[22, 22],
        &[15, 16, 17],
        &[20, 21, 19],
        &[24],
        &[19, 19, 19],
        &[16, 24, 18],
        &[21, 20],
        &[17, 17],
        &[18, 19, 20],
    ]);
    let engine = OperationsEngine::new();

    assert!(engine.classify_by_average(&readings, 20.5).unwrap());
    let c = engine.classify(&readings, 20.5).unwrap();
    let high: Vec<_> = c.high.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(high, vec!["02", "05", "08"]);
    assert_eq!(c.low.len(), 7);
}

#[test]
fn test_10_sort_does_not_alias_input() {
    let readings = herd(&[&[24, 16, 20], &[19, 19, 18]]);
    let snapshot = readings.clone();
    let engine = OperationsEngine::new();

    let sorted = engine.sort_all(&readings).unwrap();
    assert_eq!(readings, snapshot);
    assert_eq!(sorted.values().next().unwrap(), &series_of(&[16, 20, 24]));
    assert_eq!(
        sorted.keys().collect::<Vec<_>>(),
        readings.keys().collect::<Vec<_>>()
    );
}

#[test]
fn test_11_empty_series_fails_classification_only() {
    let readings = herd(&[&[20], &[]]);
    let engine = OperationsEngine::new();

    assert!(engine.sort_all(&readings).is_ok());
    assert!(engine.pattern_exists(&readings, &series_of(&[20])).unwrap());
    assert_eq!(
        engine.classify_by_average(&readings, 20.0).unwrap_err(),
        EngineError::NoReadings {
            subject: "02".into()
        }
    );
}

// ═══════════════════════════════════════════════════════
// END TO END
// ═══════════════════════════════════════════════════════

#[test]
fn test_12_seeded_runs_are_identical() {
    let config = SimulationConfig {
        seed: Some(2024),
        ..SimulationConfig::default()
    };
    let first = json_run(&config);
    let second = json_run(&config);
    assert_eq!(first, second);

    assert_eq!(first["subjects"].as_array().unwrap().len(), 10);
    assert_eq!(first["sorted"].as_array().unwrap().len(), 10);
    let c = &first["classification"];
    let total = c["high"].as_array().unwrap().len() + c["low"].as_array().unwrap().len();
    assert_eq!(total, 10);
}

#[test]
fn test_13_sorted_section_is_ordered() {
    let config = SimulationConfig {
        seed: Some(3),
        readings_per_subject: 25,
        ..SimulationConfig::default()
    };
    let doc = json_run(&config);
    for entry in doc["sorted"].as_array().unwrap() {
        let values: Vec<i64> = entry["readings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        assert_eq!(values.len(), 25);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_14_console_report_full_run() {
    let readings = herd(&[&[18, 20, 22], &[15, 17]]);
    let report = ConsoleReport::new(Vec::new());
    {
        let engine = OperationsEngine::with_sink(&report);
        execute(
            &engine,
            &readings,
            &SimulationConfig::default(),
            &Operation::All,
        )
        .unwrap();
    }
    let text = String::from_utf8(report.into_inner()).unwrap();

    let order = [
        "Monitored subjects:",
        "Readings:",
        "Sorted readings:",
        "Pattern [18, 20] found in 1 subject(s):",
        "Subjects with mean >= 20:",
        "Subjects with mean < 20:",
    ];
    let mut cursor = 0;
    for heading in order {
        let pos = text[cursor..]
            .find(heading)
            .unwrap_or_else(|| panic!("missing '{heading}' in:\n{text}"));
        cursor += pos + heading.len();
    }
}
