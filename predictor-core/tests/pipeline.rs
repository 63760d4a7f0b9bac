//! End-to-end: generate → CSV → train → save → load → predict

use std::sync::OnceLock;

use tempfile::TempDir;

use predictor_core::logic::dataset::{
    generate, load_csv_file, DatasetRow, DatasetWriter, GeneratorConfig,
};
use predictor_core::{
    train, ArtifactBundle, ArtifactError, DataError, Predictor, StudentFeatures, TrainingConfig,
};

struct Trained {
    // Keeps the artifact directory alive for the whole test binary.
    _dir: TempDir,
    predictor: Predictor,
    bundle: ArtifactBundle,
}

fn trained() -> &'static Trained {
    static TRAINED: OnceLock<Trained> = OnceLock::new();
    TRAINED.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("data").join("student_data.csv");
        let artifacts = dir.path().join("models");

        let records = generate(&GeneratorConfig::default()).unwrap();
        DatasetWriter::from_path(csv.clone()).write_all(&records).unwrap();

        let rows = load_csv_file(&csv).unwrap();
        let bundle = train(&rows, &TrainingConfig::default()).unwrap();
        bundle.save(&artifacts).unwrap();

        let predictor = Predictor::load(&artifacts).unwrap();
        Trained {
            _dir: dir,
            predictor,
            bundle,
        }
    })
}

fn student(
    gender: &str,
    age: u32,
    attendance: f64,
    hours: f64,
    previous: f64,
    education: &str,
    internet: &str,
    assignments: u32,
    internal: f64,
) -> StudentFeatures {
    StudentFeatures {
        gender: gender.to_string(),
        age,
        attendance_percentage: attendance,
        hours_studied: hours,
        previous_score: previous,
        parent_education: education.to_string(),
        internet_access: internet.to_string(),
        assignments_submitted: assignments,
        internal_marks: internal,
    }
}

#[test]
fn strong_student_passes() {
    let features = student("Male", 21, 90.0, 20.0, 80.0, "Master's", "Yes", 9, 35.0);
    let prediction = trained().predictor.predict(&features).unwrap();
    assert_eq!(prediction.predicted_class, "Pass");
    assert!(prediction.pass_probability > 0.5);
}

#[test]
fn struggling_student_fails() {
    let features = student("Female", 19, 20.0, 1.0, 25.0, "High School", "No", 1, 5.0);
    let prediction = trained().predictor.predict(&features).unwrap();
    assert_eq!(prediction.predicted_class, "Fail");
    assert!(prediction.fail_probability > 0.5);
}

#[test]
fn probabilities_sum_to_one() {
    let predictor = &trained().predictor;
    for record in generate(&GeneratorConfig::default().with_records(50).with_seed(99)).unwrap() {
        let p = predictor.predict(&record.features()).unwrap();
        assert!((p.pass_probability + p.fail_probability - 1.0).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&p.pass_probability));
    }
}

#[test]
fn unknown_parent_education_rejected() {
    let features = StudentFeatures {
        parent_education: "Unknown".to_string(),
        ..Default::default()
    };
    let err = trained().predictor.predict(&features).unwrap_err();
    assert!(matches!(err, DataError::UnknownCategory { ref column, .. } if column == "parent_education"));
}

#[test]
fn loaded_bundle_matches_trained_bundle() {
    let t = trained();
    assert_eq!(t.predictor.model_kind(), t.bundle.model.kind());
    assert_eq!(t.predictor.manifest().candidates, t.bundle.manifest.candidates);
    assert_eq!(t.predictor.manifest().checksums.len(), 4);
}

#[test]
fn selection_is_deterministic() {
    let rows: Vec<DatasetRow> = generate(&GeneratorConfig::default())
        .unwrap()
        .iter()
        .map(DatasetRow::from)
        .collect();
    let again = train(&rows, &TrainingConfig::default()).unwrap();
    let first = &trained().bundle;
    assert_eq!(again.model, first.model);
    assert_eq!(again.manifest.candidates, first.manifest.candidates);
}

#[test]
fn missing_artifacts_reported() {
    let empty = TempDir::new().unwrap();
    match Predictor::load(empty.path()) {
        Err(ArtifactError::Missing { files, .. }) => assert!(files.contains(&"best_model.json".to_string())),
        Err(other) => panic!("expected Missing, got {}", other),
        Ok(_) => panic!("loaded from an empty directory"),
    }
}
