//! Random forest of Gini CART trees

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::tree::{self, GiniStats, Tree, TreeParams};
use super::{Classifier, FitError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub bootstrap: bool,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 2,
            bootstrap: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<Tree>,
}

impl RandomForest {
    pub fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<usize>,
        params: &ForestParams,
        seed: u64,
    ) -> Result<Self, FitError> {
        let (n, d) = x.dim();
        if n == 0 || n != y.len() {
            return Err(FitError(format!("{} rows for {} labels", n, y.len())));
        }
        if params.n_trees == 0 {
            return Err(FitError("forest needs at least one tree".to_string()));
        }

        let labels: Vec<usize> = y.to_vec();
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            max_features: Some(((d as f64).sqrt().floor() as usize).max(1)),
            ..Default::default()
        };

        let mut rng = StdRng::seed_from_u64(seed);
        let trees = (0..params.n_trees)
            .map(|_| {
                let rows: Vec<usize> = if params.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                tree::grow::<GiniStats>(x, &labels, &(), rows, &tree_params, &mut rng)
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Random forest: {} trees, mean depth {:.1}",
            trees.len(),
            trees.iter().map(Tree::depth).sum::<usize>() as f64 / trees.len() as f64
        );

        Ok(Self { n_features: d, trees })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        !self.trees.is_empty() && self.trees.iter().all(|t| t.is_well_formed(self.n_features))
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, x: ArrayView2<f64>) -> Array2<f64> {
        let n_trees = self.trees.len().max(1) as f64;
        let pass: Array1<f64> = x
            .rows()
            .into_iter()
            .map(|row| self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>() / n_trees)
            .collect();
        super::binary_proba(pass.view())
    }
}
