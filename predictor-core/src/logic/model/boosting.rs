//! Second-order gradient boosted trees on logistic loss
//!
//! Margin: f(x) = base_score + η · Σ tree(x); P(class 1) = σ(f(x)).
//! Gradients and hessians of the logloss drive each tree's splits and leaf
//! weights (-G / (H + λ)).

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::logistic::sigmoid;
use super::tree::{self, GradientConfig, GradientSample, GradientStats, Tree, TreeParams};
use super::{Classifier, FitError};

const HESS_MIN: f64 = 1e-16;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    pub n_rounds: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    /// L2 regularization on leaf weights
    pub lambda: f64,
    /// Minimum hessian sum per child
    pub min_child_weight: f64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_rounds: 100,
            learning_rate: 0.3,
            max_depth: 6,
            lambda: 1.0,
            min_child_weight: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoosting {
    n_features: usize,
    base_score: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
}

impl GradientBoosting {
    pub fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<usize>,
        params: &BoostingParams,
        seed: u64,
    ) -> Result<Self, FitError> {
        let (n, d) = x.dim();
        if n == 0 || n != y.len() {
            return Err(FitError(format!("{} rows for {} labels", n, y.len())));
        }
        if !(params.learning_rate > 0.0) || params.lambda < 0.0 || !(params.min_child_weight >= 0.0) {
            return Err(FitError(format!(
                "invalid learning_rate={} / lambda={} / min_child_weight={}",
                params.learning_rate, params.lambda, params.min_child_weight
            )));
        }

        let target = y.mapv(|v| v as f64);
        let prior = (target.sum() / n as f64).clamp(1e-7, 1.0 - 1e-7);
        let base_score = (prior / (1.0 - prior)).ln();

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: 2,
            max_features: None,
            ..Default::default()
        };

        let regularization = GradientConfig {
            lambda: params.lambda,
            min_child_weight: params.min_child_weight,
        };

        // Splits never sample features here, the rng only satisfies the builder.
        let mut rng = StdRng::seed_from_u64(seed);
        let mut margin = Array1::from_elem(n, base_score);
        let mut trees = Vec::with_capacity(params.n_rounds);
        let all_rows: Vec<usize> = (0..n).collect();

        for _ in 0..params.n_rounds {
            let samples: Vec<GradientSample> = margin
                .iter()
                .zip(target.iter())
                .map(|(&f, &t)| {
                    let p = sigmoid(f);
                    GradientSample {
                        grad: p - t,
                        hess: (p * (1.0 - p)).max(HESS_MIN),
                    }
                })
                .collect();

            let tree = tree::grow::<GradientStats>(
                x,
                &samples,
                &regularization,
                all_rows.clone(),
                &tree_params,
                &mut rng,
            );
            for (m, row) in margin.iter_mut().zip(x.rows()) {
                *m += params.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
        }

        Ok(Self {
            n_features: d,
            base_score,
            learning_rate: params.learning_rate,
            trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn margin(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.rows()
            .into_iter()
            .map(|row| {
                self.base_score
                    + self.learning_rate * self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>()
            })
            .collect()
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.base_score.is_finite()
            && self.learning_rate.is_finite()
            && self.trees.iter().all(|t| t.is_well_formed(self.n_features))
    }
}

impl Classifier for GradientBoosting {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, x: ArrayView2<f64>) -> Array2<f64> {
        let pass = self.margin(x).mapv(sigmoid);
        super::binary_proba(pass.view())
    }
}
