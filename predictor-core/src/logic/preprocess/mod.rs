//! Preprocess Module - impute, encode, scale
//!
//! Fixed order:
//! 1. fill missing numeric cells with the column mean (`impute`)
//! 2. label-encode categorical columns and the target (`encoder`)
//! 3. z-score scale all nine features (`scaler`)
//!
//! Training fits each step once; inference only applies the fitted state.

pub mod encoder;
pub mod impute;
pub mod scaler;

use ndarray::{Array1, Array2};

pub use encoder::{CategoricalEncoders, LabelEncoder};
pub use impute::MeanImputer;
pub use scaler::StandardScaler;

use crate::error::DataError;
use crate::logic::dataset::DatasetRow;
use crate::logic::features::{
    FeatureVector, CATEGORICAL_COLUMNS, FEATURE_COUNT, FEATURE_LAYOUT, StudentFeatures,
    TARGET_COLUMN,
};

/// Interleave categorical codes and numeric values into layout order.
///
/// Both inputs must already be in layout order.
fn assemble(codes: [f64; 3], numeric: [f64; 6]) -> [f64; FEATURE_COUNT] {
    let mut values = [0.0f64; FEATURE_COUNT];
    let (mut c, mut n) = (0, 0);
    for (slot, name) in values.iter_mut().zip(FEATURE_LAYOUT) {
        if CATEGORICAL_COLUMNS.contains(name) {
            *slot = codes[c];
            c += 1;
        } else {
            *slot = numeric[n];
            n += 1;
        }
    }
    values
}

fn encode_categoricals<'a>(
    encoders: &CategoricalEncoders,
    value_of: impl Fn(&str) -> Option<&'a str>,
) -> Result<[f64; 3], DataError> {
    let mut codes = [0.0f64; 3];
    for (slot, column) in codes.iter_mut().zip(CATEGORICAL_COLUMNS) {
        let value = value_of(column)
            .filter(|v| !encoder::is_blank(v))
            .ok_or_else(|| encoder::missing_value(column))?;
        *slot = encoders.encode(column, value)? as f64;
    }
    Ok(codes)
}

// ============================================================================
// TRAINING SIDE
// ============================================================================

/// Dataset after imputation and label encoding, before scaling
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    /// rows × FEATURE_COUNT, layout order
    pub features: Array2<f64>,
    /// Target codes
    pub target: Array1<usize>,
    pub encoders: CategoricalEncoders,
    pub target_encoder: LabelEncoder,
}

impl EncodedDataset {
    /// Impute, fit encoders and encode every row
    pub fn fit(rows: &[DatasetRow]) -> Result<Self, DataError> {
        if rows.is_empty() {
            return Err(DataError::Empty);
        }

        let imputer = MeanImputer::fit(rows)?;
        let encoders = CategoricalEncoders::fit(rows)?;
        let target_encoder =
            LabelEncoder::fit(TARGET_COLUMN, rows.iter().map(|r| r.final_result.as_str()))?;

        let mut features = Array2::<f64>::zeros((rows.len(), FEATURE_COUNT));
        let mut target = Array1::<usize>::zeros(rows.len());

        for (i, row) in rows.iter().enumerate() {
            let codes = encode_categoricals(&encoders, |c| row.categorical(c))?;
            let values = assemble(codes, imputer.fill(row));
            features.row_mut(i).assign(&ndarray::ArrayView1::from(&values[..]));
            target[i] = target_encoder.transform(&row.final_result)?;
        }

        log::debug!(
            "Encoded {} rows; target classes {:?}",
            rows.len(),
            target_encoder.classes()
        );

        Ok(Self {
            features,
            target,
            encoders,
            target_encoder,
        })
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

// ============================================================================
// INFERENCE SIDE
// ============================================================================

/// Fitted preprocessing state applied at inference
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessor {
    pub encoders: CategoricalEncoders,
    pub scaler: StandardScaler,
}

impl Preprocessor {
    pub fn new(encoders: CategoricalEncoders, scaler: StandardScaler) -> Self {
        Self { encoders, scaler }
    }

    /// Validate ranges and label-encode one student (unscaled)
    pub fn encode(&self, features: &StudentFeatures) -> Result<FeatureVector, DataError> {
        features.validate_ranges()?;
        let codes = encode_categoricals(&self.encoders, |c| features.categorical(c))?;
        let numeric = features.numeric_fields().map(|(_, v)| v);
        Ok(FeatureVector::from_values(assemble(codes, numeric)))
    }

    /// Scale an encoded vector into a 1 × FEATURE_COUNT matrix
    pub fn scale(&self, vector: &FeatureVector) -> Result<Array2<f64>, DataError> {
        let row = Array2::from_shape_vec((1, FEATURE_COUNT), vector.as_slice().to_vec())
            .map_err(|e| DataError::Malformed {
                field: "features".to_string(),
                reason: e.to_string(),
            })?;
        self.scaler.transform(row.view())
    }
}
