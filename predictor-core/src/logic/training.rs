//! Training job: encode → split → scale → select → bundle

use chrono::Utc;

use crate::constants::{DEFAULT_SEED, DEFAULT_TEST_RATIO};
use crate::error::TrainingError;
use crate::logic::artifacts::manifest::MANIFEST_FORMAT_VERSION;
use crate::logic::artifacts::{ArtifactBundle, Manifest};
use crate::logic::dataset::DatasetRow;
use crate::logic::features::LayoutInfo;
use crate::logic::model::{select_best, split::stratified_split, ModelKind, SelectionConfig};
use crate::logic::preprocess::{EncodedDataset, StandardScaler};

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Held-out fraction used for model selection
    pub test_ratio: f64,
    /// Drives the split and every seeded candidate
    pub seed: u64,
    pub selection: SelectionConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_ratio: DEFAULT_TEST_RATIO,
            seed: DEFAULT_SEED,
            selection: SelectionConfig::default(),
        }
    }
}

impl TrainingConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_test_ratio(mut self, ratio: f64) -> Self {
        self.test_ratio = ratio;
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<ModelKind>) -> Self {
        self.selection.candidates = candidates;
        self
    }
}

/// Fit the full pipeline on `rows` and return the bundle to persist
pub fn train(rows: &[DatasetRow], config: &TrainingConfig) -> Result<ArtifactBundle, TrainingError> {
    let data = EncodedDataset::fit(rows)?;
    if data.target_encoder.len() != 2 {
        return Err(TrainingError::NotBinary(data.target_encoder.len()));
    }

    let split = stratified_split(
        data.features.view(),
        data.target.view(),
        data.target_encoder.classes(),
        config.test_ratio,
        config.seed,
    )?;
    log::info!(
        "Data split: train={}, test={}",
        split.train_len(),
        split.test_len()
    );

    // Scaling statistics come from the training partition only.
    let scaler = StandardScaler::fit(split.x_train.view())?;
    let mut scaled = split.clone();
    scaled.x_train = scaler.transform(split.x_train.view())?;
    scaled.x_test = scaler.transform(split.x_test.view())?;

    let selection_config = SelectionConfig {
        seed: config.seed,
        ..config.selection.clone()
    };
    let selection = select_best(&scaled, &selection_config)?;

    let manifest = Manifest {
        format_version: MANIFEST_FORMAT_VERSION,
        layout: LayoutInfo::current(),
        model: selection.model.kind(),
        model_name: selection.model.name().to_string(),
        metrics: selection.metrics,
        candidates: selection.reports,
        skipped: selection.failures,
        train_rows: split.train_len(),
        test_rows: split.test_len(),
        seed: config.seed,
        created_at: Utc::now(),
        checksums: Default::default(),
    };

    Ok(ArtifactBundle {
        model: selection.model,
        scaler,
        encoders: data.encoders,
        target_encoder: data.target_encoder,
        manifest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::{generate, GeneratorConfig};
    use crate::logic::model::Classifier;

    fn rows(n: usize, seed: u64) -> Vec<DatasetRow> {
        generate(&GeneratorConfig::default().with_records(n).with_seed(seed))
            .unwrap()
            .iter()
            .map(DatasetRow::from)
            .collect()
    }

    fn fast_config() -> TrainingConfig {
        TrainingConfig::default()
            .with_candidates(vec![ModelKind::LogisticRegression, ModelKind::RandomForest])
    }

    #[test]
    fn test_train_produces_consistent_bundle() {
        let bundle = train(&rows(300, 42), &fast_config()).unwrap();
        assert!(bundle.validate().is_ok());
        assert_eq!(bundle.manifest.train_rows + bundle.manifest.test_rows, 300);
        assert_eq!(bundle.manifest.test_rows, 60);
        assert_eq!(bundle.manifest.candidates.len(), 2);
        assert_eq!(bundle.model.n_features(), 9);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let data = rows(300, 7);
        let a = train(&data, &fast_config()).unwrap();
        let b = train(&data, &fast_config()).unwrap();
        assert_eq!(a.model, b.model);
        assert_eq!(a.scaler, b.scaler);
        assert_eq!(a.manifest.candidates, b.manifest.candidates);
    }

    #[test]
    fn test_single_class_target_rejected() {
        let mut data = rows(50, 1);
        for row in &mut data {
            row.final_result = "Pass".to_string();
        }
        assert!(matches!(
            train(&data, &fast_config()),
            Err(TrainingError::NotBinary(1))
        ));
    }

    #[test]
    fn test_scaled_training_columns_are_standardized() {
        let data = rows(300, 3);
        let bundle = train(&data, &fast_config()).unwrap();
        let encoded = EncodedDataset::fit(&data).unwrap();
        let (train_idx, _) = crate::logic::model::split::stratified_indices(
            encoded.target.view(),
            encoded.target_encoder.classes(),
            0.2,
            DEFAULT_SEED,
        )
        .unwrap();
        let x_train = encoded.features.select(ndarray::Axis(0), &train_idx);
        let z = bundle.scaler.transform(x_train.view()).unwrap();
        for col in z.columns() {
            assert!(col.mean().unwrap().abs() < 1e-6);
            assert!((col.std(0.0) - 1.0).abs() < 1e-6);
        }
    }
}
