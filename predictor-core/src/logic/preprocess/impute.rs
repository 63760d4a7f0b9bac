//! Mean imputation for missing numeric cells

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::logic::dataset::DatasetRow;
use crate::logic::features::layout::NUMERIC_RANGES;

const NUMERIC_COUNT: usize = NUMERIC_RANGES.len();

/// Column means computed over the dataset being imputed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanImputer {
    means: [f64; NUMERIC_COUNT],
}

impl MeanImputer {
    pub fn fit(rows: &[DatasetRow]) -> Result<Self, DataError> {
        let mut sums = [0.0f64; NUMERIC_COUNT];
        let mut counts = [0usize; NUMERIC_COUNT];

        for row in rows {
            for (j, cell) in row.numeric_cells().iter().enumerate() {
                if let Some(v) = cell.filter(|v| v.is_finite()) {
                    sums[j] += v;
                    counts[j] += 1;
                }
            }
        }

        let mut means = [0.0f64; NUMERIC_COUNT];
        for j in 0..NUMERIC_COUNT {
            if counts[j] == 0 {
                return Err(DataError::EmptyColumn(NUMERIC_RANGES[j].name));
            }
            means[j] = sums[j] / counts[j] as f64;
        }

        let missing: usize = rows.len() * NUMERIC_COUNT - counts.iter().sum::<usize>();
        if missing > 0 {
            log::info!("Imputing {} missing numeric cells with column means", missing);
        }

        Ok(Self { means })
    }

    pub fn means(&self) -> &[f64; NUMERIC_COUNT] {
        &self.means
    }

    /// Numeric cells of `row` with gaps filled, in layout order
    pub fn fill(&self, row: &DatasetRow) -> [f64; NUMERIC_COUNT] {
        let cells = row.numeric_cells();
        let mut out = self.means;
        for (j, cell) in cells.iter().enumerate() {
            if let Some(v) = cell.filter(|v| v.is_finite()) {
                out[j] = v;
            }
        }
        out
    }
}
