use std::fs;

use tempfile::TempDir;

use super::*;
use crate::logic::dataset::{generate, DatasetRow, GeneratorConfig};
use crate::logic::model::ModelKind;
use crate::logic::training::{train, TrainingConfig};

fn bundle(seed: u64) -> ArtifactBundle {
    let rows: Vec<DatasetRow> = generate(&GeneratorConfig::default().with_records(200).with_seed(seed))
        .unwrap()
        .iter()
        .map(DatasetRow::from)
        .collect();
    let config = TrainingConfig::default()
        .with_seed(seed)
        .with_candidates(vec![ModelKind::LogisticRegression]);
    train(&rows, &config).unwrap()
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let original = bundle(42);
    let written = original.save(dir.path()).unwrap();

    for file in PAYLOAD_FILES.iter().chain([MANIFEST_FILE].iter()) {
        assert!(dir.path().join(file).is_file(), "{} not written", file);
    }
    assert_eq!(written.checksums.len(), PAYLOAD_FILES.len());

    let loaded = ArtifactBundle::load(dir.path()).unwrap();
    assert_eq!(loaded.model, original.model);
    assert_eq!(loaded.scaler, original.scaler);
    assert_eq!(loaded.encoders, original.encoders);
    assert_eq!(loaded.target_encoder, original.target_encoder);
    assert_eq!(loaded.manifest, written);
}

#[test]
fn test_empty_dir_reports_every_missing_file() {
    let dir = TempDir::new().unwrap();
    match ArtifactBundle::load(dir.path()) {
        Err(ArtifactError::Missing { files, .. }) => assert_eq!(files.len(), 5),
        other => panic!("expected Missing, got {:?}", other.map(|b| b.model.name())),
    }
}

#[test]
fn test_one_missing_file() {
    let dir = TempDir::new().unwrap();
    bundle(42).save(dir.path()).unwrap();
    fs::remove_file(dir.path().join(SCALER_FILE)).unwrap();

    let err = ArtifactBundle::load(dir.path()).unwrap_err();
    assert!(err.is_missing());
    assert!(err.to_string().contains(SCALER_FILE));
}

#[test]
fn test_mixed_runs_rejected() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    bundle(1).save(a.path()).unwrap();
    bundle(2).save(b.path()).unwrap();

    // Scaler from run 2 next to the manifest of run 1.
    fs::copy(b.path().join(SCALER_FILE), a.path().join(SCALER_FILE)).unwrap();
    assert!(matches!(
        ArtifactBundle::load(a.path()),
        Err(ArtifactError::Mismatch(_))
    ));
}

#[test]
fn test_corrupt_manifest_is_parse_error() {
    let dir = TempDir::new().unwrap();
    bundle(42).save(dir.path()).unwrap();
    fs::write(dir.path().join(MANIFEST_FILE), b"{ not json").unwrap();
    assert!(matches!(
        ArtifactBundle::load(dir.path()),
        Err(ArtifactError::Parse { .. })
    ));
}

#[test]
fn test_manifest_model_kind_checked() {
    let mut b = bundle(42);
    b.manifest.model = ModelKind::RandomForest;
    assert!(matches!(b.validate(), Err(ArtifactError::Mismatch(_))));
}
