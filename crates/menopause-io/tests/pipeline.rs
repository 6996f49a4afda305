//! Integration tests: CSV -> encode/stage -> fit preprocessors -> artifacts -> decode.

use std::path::Path;

use menopause_io::{
    Artifact, ArtifactWriter, ClinicalReader, ENCODER_FILE, SCALER_FILE, read_artifact,
};
use menopause_prep::{
    LabelEncoding, N_FEATURES, StageLabel, StandardScaler, derive_stages, encode_records,
    feature_matrix,
};
use tempfile::TempDir;

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn preprocessing_artifacts_round_trip() {
    // 1. Read CSV
    let records = ClinicalReader::new(&fixture_path("clinical_12.csv"))
        .read()
        .expect("fixture should parse");
    assert_eq!(records.len(), 12);

    // 2. Encode and derive stages
    let encoded = encode_records(&records);
    let stages = derive_stages(&encoded).unwrap();
    for stage in StageLabel::ALL {
        assert_eq!(stages.iter().filter(|&&s| s == stage).count(), 4, "{stage}");
    }

    let matrix = feature_matrix(&encoded).unwrap();
    assert!(matrix.iter().all(|row| row.len() == N_FEATURES));

    // 3. Fit preprocessors
    let encoding = LabelEncoding::fit(&stages).unwrap();
    let labels = encoding.encode_all(&stages).unwrap();
    assert_eq!(labels.len(), 12);
    let (scaler, scaled) = StandardScaler::fit_transform(&matrix).unwrap();
    assert_eq!(scaled.len(), 12);

    // 4. Persist
    let dir = TempDir::new().unwrap();
    let writer = ArtifactWriter::new(&dir.path().join("models")).unwrap();
    let scaler_bytes = scaler.to_bytes().unwrap();
    let encoder_bytes = encoding.to_bytes().unwrap();
    let paths = writer
        .write_all(&[
            Artifact { name: SCALER_FILE, bytes: &scaler_bytes },
            Artifact { name: ENCODER_FILE, bytes: &encoder_bytes },
        ])
        .unwrap();
    assert_eq!(paths.len(), 2);

    // 5. Read back and decode
    let scaler_back = StandardScaler::from_bytes(&read_artifact(&paths[0]).unwrap()).unwrap();
    let encoding_back = LabelEncoding::from_bytes(&read_artifact(&paths[1]).unwrap()).unwrap();
    assert_eq!(scaler_back, scaler);
    assert_eq!(encoding_back, encoding);
    assert_eq!(
        encoding_back.classes(),
        ["Perimenopause", "Postmenopause", "Premenopause"]
    );

    // 6. Decoded scaler reproduces the training transform
    let again = scaler_back.transform(&matrix).unwrap();
    assert_eq!(again, scaled);
}

#[test]
fn swapped_artifacts_rejected() {
    let records = ClinicalReader::new(&fixture_path("clinical_12.csv"))
        .read()
        .unwrap();
    let encoded = encode_records(&records);
    let matrix = feature_matrix(&encoded).unwrap();
    let scaler = StandardScaler::fit(&matrix).unwrap();

    let dir = TempDir::new().unwrap();
    let writer = ArtifactWriter::new(dir.path()).unwrap();
    let bytes = scaler.to_bytes().unwrap();
    // Scaler bytes written under the encoder's name.
    let paths = writer
        .write_all(&[Artifact { name: ENCODER_FILE, bytes: &bytes }])
        .unwrap();

    let raw = read_artifact(&paths[0]).unwrap();
    assert!(LabelEncoding::from_bytes(&raw).is_err());
    assert!(StandardScaler::from_bytes(&raw).is_ok());
}
