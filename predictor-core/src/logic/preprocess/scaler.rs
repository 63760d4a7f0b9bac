//! Standard scaler - per-feature z-score
//!
//! Population standard deviation (ddof = 0). A zero-variance feature makes
//! scaling undefined and is rejected at fit time.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::logic::features::layout::feature_name;

const MIN_STD: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    std_devs: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: ArrayView2<f64>) -> Result<Self, DataError> {
        if x.nrows() == 0 {
            return Err(DataError::Empty);
        }
        let means = x.mean_axis(Axis(0)).ok_or(DataError::Empty)?;
        let std_devs = x.std_axis(Axis(0), 0.0);

        for (j, &s) in std_devs.iter().enumerate() {
            if !(s.is_finite() && s > MIN_STD) {
                return Err(DataError::ConstantFeature(feature_name(j).unwrap_or("unnamed")));
            }
        }

        Ok(Self {
            means: means.to_vec(),
            std_devs: std_devs.to_vec(),
        })
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }

    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, DataError> {
        if x.ncols() != self.n_features() {
            return Err(DataError::FeatureWidth {
                expected: self.n_features(),
                found: x.ncols(),
            });
        }
        let means = ArrayView1::from(&self.means[..]);
        let stds = ArrayView1::from(&self.std_devs[..]);
        Ok((&x - &means) / &stds)
    }

    /// Reject parameter sets that could not have come from `fit`
    pub fn is_valid(&self) -> bool {
        self.means.len() == self.std_devs.len()
            && self.means.iter().all(|m| m.is_finite())
            && self.std_devs.iter().all(|s| s.is_finite() && *s > MIN_STD)
    }
}
