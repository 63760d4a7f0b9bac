//! Model Module - classifiers, evaluation, selection, inference
//!
//! Candidates are fit on the same scaled split and compared on held-out
//! weighted F1. The winner is wrapped in [`TrainedModel`] so it can be
//! persisted without trait objects.

pub mod forest;
pub mod inference;
pub mod logistic;
pub mod metrics;
pub mod selection;
pub mod split;
pub mod tree;

#[cfg(feature = "gradient-boosting")]
pub mod boosting;

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use forest::{ForestParams, RandomForest};
pub use inference::{Prediction, Predictor};
pub use logistic::{LogisticParams, LogisticRegression};
pub use metrics::{evaluate, Metrics};
pub use selection::{select_best, CandidateReport, SelectionConfig, Selection};
pub use split::{stratified_split, Split};

#[cfg(feature = "gradient-boosting")]
pub use boosting::{BoostingParams, GradientBoosting};

// ============================================================================
// CLASSIFIER CONTRACT
// ============================================================================

/// A candidate failed to fit
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct FitError(pub String);

/// Binary probabilistic classifier over scaled feature rows.
///
/// Column `k` of `predict_proba` is the probability of target code `k`.
pub trait Classifier {
    /// Width of the rows the model was fit on
    fn n_features(&self) -> usize;

    /// rows × 2, each row sums to 1
    fn predict_proba(&self, x: ArrayView2<f64>) -> Array2<f64>;

    /// Argmax of `predict_proba`; ties go to the lower code
    fn predict(&self, x: ArrayView2<f64>) -> Array1<usize> {
        self.predict_proba(x)
            .axis_iter(Axis(0))
            .map(|row| usize::from(row[1] > row[0]))
            .collect()
    }
}

/// Stack P(class 1) into a two-column probability matrix
pub(crate) fn binary_proba(pass: ArrayView1<f64>) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros((pass.len(), 2));
    for (mut row, &p) in out.rows_mut().into_iter().zip(pass.iter()) {
        let p = p.clamp(0.0, 1.0);
        row[0] = 1.0 - p;
        row[1] = p;
    }
    out
}

// ============================================================================
// MODEL KINDS
// ============================================================================

/// Candidate classifiers, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    RandomForest,
    GradientBoosting,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::LogisticRegression,
        ModelKind::RandomForest,
        ModelKind::GradientBoosting,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "Logistic Regression",
            ModelKind::RandomForest => "Random Forest",
            ModelKind::GradientBoosting => "Gradient Boosting",
        }
    }

    /// Whether this build can fit the candidate
    pub fn is_available(&self) -> bool {
        match self {
            ModelKind::GradientBoosting => cfg!(feature = "gradient-boosting"),
            _ => true,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// TRAINED MODEL
// ============================================================================

/// The selected classifier with frozen parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum TrainedModel {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
    #[cfg(feature = "gradient-boosting")]
    GradientBoosting(GradientBoosting),
}

impl TrainedModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            TrainedModel::LogisticRegression(_) => ModelKind::LogisticRegression,
            TrainedModel::RandomForest(_) => ModelKind::RandomForest,
            #[cfg(feature = "gradient-boosting")]
            TrainedModel::GradientBoosting(_) => ModelKind::GradientBoosting,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            TrainedModel::LogisticRegression(m) => m,
            TrainedModel::RandomForest(m) => m,
            #[cfg(feature = "gradient-boosting")]
            TrainedModel::GradientBoosting(m) => m,
        }
    }

    /// Parameters are finite and every tree node is consistent
    pub fn is_well_formed(&self) -> bool {
        match self {
            TrainedModel::LogisticRegression(m) => {
                m.intercept.is_finite() && m.coefficients.iter().all(|c| c.is_finite())
            }
            TrainedModel::RandomForest(m) => m.is_well_formed(),
            #[cfg(feature = "gradient-boosting")]
            TrainedModel::GradientBoosting(m) => m.is_well_formed(),
        }
    }
}

impl Classifier for TrainedModel {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn predict_proba(&self, x: ArrayView2<f64>) -> Array2<f64> {
        self.inner().predict_proba(x)
    }

    fn predict(&self, x: ArrayView2<f64>) -> Array1<usize> {
        self.inner().predict(x)
    }
}
