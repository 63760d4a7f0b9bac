//! L2-regularized logistic regression, fit by Newton's method
//!
//! Objective: Σ logloss(yᵢ, σ(xᵢ·w + b)) + ‖w‖² / (2C). The intercept is
//! not penalized. Each Newton system is solved with nalgebra (Cholesky,
//! falling back to SVD for near-singular Hessians).

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::{Classifier, FitError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Inverse regularization strength
    pub c: f64,
    pub max_iter: usize,
    /// Stop once the largest Newton step component falls below this
    pub tol: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tol: 1e-8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

#[inline]
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    pub fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<usize>,
        params: &LogisticParams,
    ) -> Result<Self, FitError> {
        let (n, d) = x.dim();
        if n == 0 || n != y.len() {
            return Err(FitError(format!("{} rows for {} labels", n, y.len())));
        }
        if params.c <= 0.0 {
            return Err(FitError(format!("C must be positive, got {}", params.c)));
        }

        // Column 0 is the intercept.
        let dim = d + 1;
        let mut design = Array2::<f64>::ones((n, dim));
        design.slice_mut(ndarray::s![.., 1..]).assign(&x);
        let target = y.mapv(|v| v as f64);
        let alpha = 1.0 / params.c;

        let mut w = Array1::<f64>::zeros(dim);
        let mut converged = false;

        for iter in 0..params.max_iter {
            let p = design.dot(&w).mapv(sigmoid);
            let weights = p.mapv(|pi| (pi * (1.0 - pi)).max(1e-12));

            let mut grad = design.t().dot(&(&p - &target));
            let weighted = &design * &weights.view().insert_axis(Axis(1));
            let mut hess = design.t().dot(&weighted);
            for j in 1..dim {
                grad[j] += alpha * w[j];
                hess[[j, j]] += alpha;
            }

            let step = solve(&hess, &grad)
                .ok_or_else(|| FitError(format!("singular Hessian at iteration {}", iter)))?;

            let max_step = step.iter().fold(0.0f64, |m, s| m.max(s.abs()));
            w -= &step;

            if !w.iter().all(|v| v.is_finite()) {
                return Err(FitError("coefficients diverged".to_string()));
            }
            if max_step < params.tol {
                log::debug!("Logistic regression converged after {} iterations", iter + 1);
                converged = true;
                break;
            }
        }

        if !converged {
            log::warn!(
                "Logistic regression hit max_iter={} before converging",
                params.max_iter
            );
        }

        Ok(Self {
            intercept: w[0],
            coefficients: w.slice(ndarray::s![1..]).to_vec(),
        })
    }

    /// Raw margin x·w + b per row
    pub fn decision_function(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.dot(&ArrayView1::from(&self.coefficients[..])) + self.intercept
    }
}

fn solve(hess: &Array2<f64>, grad: &Array1<f64>) -> Option<Array1<f64>> {
    let dim = grad.len();
    let h = DMatrix::from_fn(dim, dim, |i, j| hess[[i, j]]);
    let g = DVector::from_iterator(dim, grad.iter().copied());

    let step = match h.clone().cholesky() {
        Some(chol) => chol.solve(&g),
        None => h.svd(true, true).solve(&g, 1e-10).ok()?,
    };

    step.iter()
        .all(|v| v.is_finite())
        .then(|| Array1::from_iter(step.iter().copied()))
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, x: ArrayView2<f64>) -> Array2<f64> {
        let pass = self.decision_function(x).mapv(sigmoid);
        super::binary_proba(pass.view())
    }
}
