//! End-to-end tests: CSV -> train -> artifacts -> predictor.

use std::fs;
use std::path::{Path, PathBuf};

use menopause::{Predictor, TrainError, TrainingConfig, train};
use menopause_io::{
    ClinicalReader, ENCODER_FILE, IoError, MANIFEST_FILE, MODEL_FILE, SCALER_FILE,
};
use menopause_prep::{ClinicalRecord, PrepError, StageLabel, derive_stages, encode_records};
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn config_into(out: &Path) -> TrainingConfig {
    TrainingConfig::new(&fixture_path("clinical_50.csv"), out)
}

fn record(age: f64, estrogen: f64, fsh: f64, years: f64, symptoms: [&str; 7]) -> ClinicalRecord {
    ClinicalRecord {
        age,
        estrogen_level: estrogen,
        fsh_level: fsh,
        years_since_last_period: years,
        symptoms: symptoms.map(String::from),
    }
}

/// The `Expected_Stage` column of the 50-record fixture, in row order.
fn expected_stages() -> Vec<StageLabel> {
    let csv = fs::read_to_string(fixture_path("clinical_50.csv")).unwrap();
    let mut lines = csv.lines();
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();
    let col = header.iter().position(|h| *h == "Expected_Stage").unwrap();
    lines
        .filter(|l| !l.is_empty())
        .map(|l| l.split(',').nth(col).unwrap().parse().unwrap())
        .collect()
}

#[test]
fn every_fixture_row_gets_its_expected_stage() {
    let records = ClinicalReader::new(&fixture_path("clinical_50.csv"))
        .read()
        .unwrap();
    let derived = derive_stages(&encode_records(&records)).unwrap();
    let expected = expected_stages();
    assert_eq!(expected.len(), 50);
    for (row, (got, want)) in derived.iter().zip(&expected).enumerate() {
        assert_eq!(got, want, "record {row}");
    }
}

#[test]
fn repeated_runs_are_identical() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    let first = train(&config_into(a.path())).unwrap();
    let second = train(&config_into(b.path())).unwrap();

    assert_eq!(first.accuracy, second.accuracy);
    for name in [MODEL_FILE, SCALER_FILE, ENCODER_FILE] {
        assert_eq!(
            fs::read(a.path().join(name)).unwrap(),
            fs::read(b.path().join(name)).unwrap(),
            "{name} differs between runs"
        );
    }
}

#[test]
fn accuracy_bounded_and_beats_majority_baseline() {
    let dir = TempDir::new().unwrap();
    let outcome = train(&config_into(dir.path())).unwrap();

    assert!((0.0..=1.0).contains(&outcome.accuracy));
    assert_eq!(outcome.n_samples, 50);
    assert_eq!(outcome.n_train + outcome.n_test, 50);

    let majority = outcome.class_counts.values().copied().max().unwrap();
    let baseline = majority as f64 / outcome.n_samples as f64;
    assert!(
        outcome.accuracy >= baseline - 0.05,
        "accuracy {} below baseline {baseline}",
        outcome.accuracy
    );
}

#[test]
fn outcome_reports_stages_and_artifacts() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("models");
    let outcome = train(&config_into(&out)).unwrap();

    assert_eq!(outcome.class_counts["Premenopause"], 18);
    assert_eq!(outcome.class_counts["Perimenopause"], 16);
    assert_eq!(outcome.class_counts["Postmenopause"], 16);
    // round(n * 0.2) per stage: 4 + 3 + 3
    assert_eq!(outcome.n_test, 10);

    assert_eq!(
        outcome.artifacts,
        vec![out.join(MODEL_FILE), out.join(SCALER_FILE), out.join(ENCODER_FILE)]
    );
    assert_eq!(outcome.importances.len(), 11);
    assert_eq!(outcome.forest.n_trees, 300);
    assert_eq!(outcome.forest.max_features, 3);
    assert_eq!(outcome.class_metrics.len(), 3);
    assert_eq!(
        outcome.class_metrics.iter().map(|m| m.support).sum::<usize>(),
        outcome.n_test
    );
}

#[test]
fn predictor_loads_saved_artifacts() {
    let dir = TempDir::new().unwrap();
    train(&config_into(dir.path())).unwrap();
    let predictor = Predictor::load(dir.path()).unwrap();
    assert_eq!(
        predictor.classes(),
        ["Perimenopause", "Postmenopause", "Premenopause"]
    );

    let post = record(60.0, 10.0, 95.0, 8.0, ["No", "Yes", "Yes", "Yes", "Yes", "Yes", "No"]);
    let prediction = predictor.predict(&post).unwrap();
    assert_eq!(prediction.stage, StageLabel::Postmenopause);

    let total: f64 = prediction.probabilities.values().sum();
    assert!((total - 1.0).abs() < 1e-9);
    let max = prediction
        .probabilities
        .values()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(prediction.confidence, max);
    assert_eq!(prediction.probabilities["Postmenopause"], prediction.confidence);
}

#[test]
fn predictor_rejects_unencodable_record() {
    let dir = TempDir::new().unwrap();
    train(&config_into(dir.path())).unwrap();
    let predictor = Predictor::load(dir.path()).unwrap();

    let bad = record(45.0, 60.0, 20.0, 0.0, ["Yes", "No", "No", "sometimes", "No", "No", "No"]);
    assert!(matches!(
        predictor.predict(&bad),
        Err(TrainError::Prep(PrepError::MissingIndicator { column: "Night_Sweats", .. }))
    ));
}

#[test]
fn predictor_requires_all_artifacts() {
    let dir = TempDir::new().unwrap();
    train(&config_into(dir.path())).unwrap();
    fs::remove_file(dir.path().join(SCALER_FILE)).unwrap();
    assert!(matches!(
        Predictor::load(dir.path()),
        Err(TrainError::Io(IoError::IncompleteArtifacts { .. }))
    ));
}

#[test]
fn predictor_refuses_set_without_manifest() {
    let dir = TempDir::new().unwrap();
    train(&config_into(dir.path())).unwrap();
    assert!(dir.path().join(MANIFEST_FILE).exists());
    Predictor::load(dir.path()).unwrap();

    fs::remove_file(dir.path().join(MANIFEST_FILE)).unwrap();
    assert!(matches!(
        Predictor::load(dir.path()),
        Err(TrainError::Io(IoError::IncompleteArtifacts { .. }))
    ));
}

#[test]
fn invalid_indicator_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let csv = fs::read_to_string(fixture_path("clinical_50.csv")).unwrap();
    let mut lines: Vec<String> = csv.lines().map(String::from).collect();
    // Irregular_Periods of the third record.
    let mut cells: Vec<String> = lines[3].split(',').map(String::from).collect();
    cells[4] = "Maybe".to_string();
    lines[3] = cells.join(",");
    let data = dir.path().join("bad.csv");
    fs::write(&data, lines.join("\n")).unwrap();

    let out = dir.path().join("models");
    let err = train(&TrainingConfig::new(&data, &out)).unwrap_err();
    assert!(matches!(
        err,
        TrainError::Prep(PrepError::MissingIndicator {
            row: 2,
            column: "Irregular_Periods"
        })
    ));
    assert!(!out.exists());
}

#[test]
fn padded_indicator_rejected() {
    let dir = TempDir::new().unwrap();
    let csv = fs::read_to_string(fixture_path("clinical_50.csv")).unwrap();
    let mut lines: Vec<String> = csv.lines().map(String::from).collect();
    // Hot_Flashes of the first record.
    let mut cells: Vec<String> = lines[1].split(',').map(String::from).collect();
    cells[6] = format!(" {} ", cells[6]);
    lines[1] = cells.join(",");
    let data = dir.path().join("padded.csv");
    fs::write(&data, lines.join("\n")).unwrap();

    let err = train(&TrainingConfig::new(&data, &dir.path().join("models"))).unwrap_err();
    assert!(matches!(
        err,
        TrainError::Prep(PrepError::MissingIndicator {
            row: 0,
            column: "Hot_Flashes"
        })
    ));
}

#[test]
fn failed_run_keeps_previous_artifacts() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("models");
    train(&config_into(&out)).unwrap();
    let before = fs::read(out.join(MODEL_FILE)).unwrap();

    let data = dir.path().join("header_only.csv");
    let csv = fs::read_to_string(fixture_path("clinical_50.csv")).unwrap();
    fs::write(&data, format!("{}\n", csv.lines().next().unwrap())).unwrap();

    let err = train(&TrainingConfig::new(&data, &out)).unwrap_err();
    assert!(matches!(err, TrainError::Io(IoError::EmptyDataset { .. })));
    assert_eq!(fs::read(out.join(MODEL_FILE)).unwrap(), before);
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let cfg = TrainingConfig::new(&dir.path().join("absent.csv"), &dir.path().join("models"));
    assert!(matches!(
        train(&cfg),
        Err(TrainError::Io(IoError::FileNotFound { .. }))
    ));
}

#[test]
fn single_stage_dataset_rejected() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("young.csv");
    let mut csv = String::from(
        "Age,Estrogen_Level,FSH_Level,Years_Since_Last_Period,Irregular_Periods,Missed_Periods,Hot_Flashes,Night_Sweats,Sleep_Problems,Vaginal_Dryness,Joint_Pain\n",
    );
    for age in 20..30 {
        csv.push_str(&format!("{age},120,6,0,Yes,No,No,No,No,No,No\n"));
    }
    fs::write(&data, csv).unwrap();

    let err = train(&TrainingConfig::new(&data, &dir.path().join("models"))).unwrap_err();
    assert!(matches!(err, TrainError::Prep(PrepError::TooFewClasses { found: 1 })));
}
