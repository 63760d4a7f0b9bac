//! Inference - apply a loaded artifact bundle to one student
//!
//! The predictor is built once from an immutable bundle and shared
//! read-only (e.g. behind an `Arc`); it never refits anything.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Classifier, ModelKind, TrainedModel};
use crate::error::{ArtifactError, DataError};
use crate::logic::artifacts::{ArtifactBundle, Manifest};
use crate::logic::features::{FinalResult, StudentFeatures};
use crate::logic::preprocess::{LabelEncoder, Preprocessor};

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Decoded target label ("Pass" / "Fail")
    pub predicted_class: String,
    pub pass_probability: f64,
    pub fail_probability: f64,
    pub model_name: String,
}

impl Prediction {
    pub fn is_pass(&self) -> bool {
        self.predicted_class == FinalResult::Pass.as_str()
    }

    /// Probability of the predicted class
    pub fn confidence(&self) -> f64 {
        if self.is_pass() { self.pass_probability } else { self.fail_probability }
    }
}

#[derive(Debug, Clone)]
pub struct Predictor {
    preprocessor: Preprocessor,
    model: TrainedModel,
    target_encoder: LabelEncoder,
    manifest: Manifest,
    pass_code: usize,
    fail_code: usize,
}

impl Predictor {
    pub fn new(bundle: ArtifactBundle) -> Result<Self, ArtifactError> {
        bundle.validate()?;

        let code_of = |label: FinalResult| {
            bundle.target_encoder.transform(label.as_str()).map_err(|_| {
                ArtifactError::Mismatch(format!(
                    "target encoder has no '{}' class ({:?})",
                    label,
                    bundle.target_encoder.classes()
                ))
            })
        };
        let pass_code = code_of(FinalResult::Pass)?;
        let fail_code = code_of(FinalResult::Fail)?;

        Ok(Self {
            preprocessor: bundle.preprocessor(),
            model: bundle.model,
            target_encoder: bundle.target_encoder,
            manifest: bundle.manifest,
            pass_code,
            fail_code,
        })
    }

    /// Load and verify the bundle in `dir`
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        Self::new(ArtifactBundle::load(dir)?)
    }

    pub fn model_kind(&self) -> ModelKind {
        self.model.kind()
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn predict(&self, features: &StudentFeatures) -> Result<Prediction, DataError> {
        let vector = self.preprocessor.encode(features)?;
        log::trace!("Encoded input: {}", vector.to_log_entry());
        let x = self.preprocessor.scale(&vector)?;
        let proba = self.model.predict_proba(x.view());
        let code = self.model.predict(x.view())[0];

        let pass_probability = proba[[0, self.pass_code]];
        let fail_probability = proba[[0, self.fail_code]];
        let predicted_class = self.target_encoder.inverse_transform(code)?.to_string();

        log::debug!(
            "{} -> {} (pass={:.3})",
            self.model_name(),
            predicted_class,
            pass_probability
        );

        Ok(Prediction {
            predicted_class,
            pass_probability,
            fail_probability,
            model_name: self.model_name().to_string(),
        })
    }
}
