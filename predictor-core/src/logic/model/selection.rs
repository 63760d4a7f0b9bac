//! Candidate fitting and best-model selection

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::forest::{ForestParams, RandomForest};
use super::logistic::{LogisticParams, LogisticRegression};
use super::metrics::{evaluate, Metrics};
use super::split::Split;
use super::{Classifier, FitError, ModelKind, TrainedModel};
use crate::constants::DEFAULT_SEED;
use crate::error::{CandidateFailure, TrainingError};

#[cfg(feature = "gradient-boosting")]
use super::boosting::{BoostingParams, GradientBoosting};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Evaluated in this order; earlier wins F1 ties
    pub candidates: Vec<ModelKind>,
    pub seed: u64,
    pub logistic: LogisticParams,
    pub forest: ForestParams,
    #[cfg(feature = "gradient-boosting")]
    pub boosting: BoostingParams,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            candidates: ModelKind::ALL.to_vec(),
            seed: DEFAULT_SEED,
            logistic: LogisticParams::default(),
            forest: ForestParams::default(),
            #[cfg(feature = "gradient-boosting")]
            boosting: BoostingParams::default(),
        }
    }
}

/// Held-out evaluation of one fitted candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateReport {
    pub kind: ModelKind,
    pub name: String,
    pub metrics: Metrics,
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub model: TrainedModel,
    pub metrics: Metrics,
    /// Every successfully fitted candidate, in evaluation order
    pub reports: Vec<CandidateReport>,
    pub failures: Vec<CandidateFailure>,
}

/// Fit one candidate on the training partition
pub fn fit_candidate(
    kind: ModelKind,
    x: ArrayView2<f64>,
    y: ArrayView1<usize>,
    config: &SelectionConfig,
) -> Result<TrainedModel, FitError> {
    match kind {
        ModelKind::LogisticRegression => {
            LogisticRegression::fit(x, y, &config.logistic).map(TrainedModel::LogisticRegression)
        }
        ModelKind::RandomForest => {
            RandomForest::fit(x, y, &config.forest, config.seed).map(TrainedModel::RandomForest)
        }
        #[cfg(feature = "gradient-boosting")]
        ModelKind::GradientBoosting => GradientBoosting::fit(x, y, &config.boosting, config.seed)
            .map(TrainedModel::GradientBoosting),
        #[cfg(not(feature = "gradient-boosting"))]
        ModelKind::GradientBoosting => Err(FitError(
            "not compiled in (build with the `gradient-boosting` feature)".to_string(),
        )),
    }
}

/// Fit every candidate, keep the strictly best weighted F1 on the test
/// partition. Failed candidates are skipped with a warning.
pub fn select_best(split: &Split, config: &SelectionConfig) -> Result<Selection, TrainingError> {
    if config.candidates.is_empty() {
        return Err(TrainingError::InvalidConfig("no candidate models configured".to_string()));
    }

    let mut best: Option<(TrainedModel, Metrics)> = None;
    let mut reports = Vec::new();
    let mut failures = Vec::new();

    for &kind in &config.candidates {
        let model = match fit_candidate(kind, split.x_train.view(), split.y_train.view(), config) {
            Ok(model) => model,
            Err(e) => {
                let failure = CandidateFailure {
                    model: kind.display_name().to_string(),
                    reason: e.to_string(),
                };
                log::warn!("Skipping candidate: {}", failure);
                failures.push(failure);
                continue;
            }
        };

        let y_pred = model.predict(split.x_test.view());
        let metrics = evaluate(split.y_test.view(), y_pred.view());
        log::info!(
            "{}: accuracy={:.4} f1={:.4}",
            kind,
            metrics.accuracy,
            metrics.f1
        );

        reports.push(CandidateReport {
            kind,
            name: kind.display_name().to_string(),
            metrics,
        });

        let better = best.as_ref().map_or(true, |(_, m)| metrics.f1 > m.f1);
        if better {
            best = Some((model, metrics));
        }
    }

    let (model, metrics) = best.ok_or_else(|| TrainingError::NoCandidates(failures.clone()))?;
    log::info!("Selected {} (F1 {:.4})", model.name(), metrics.f1);

    Ok(Selection {
        model,
        metrics,
        reports,
        failures,
    })
}
