//! Error types shared across the pipeline

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid or unexpected data at a preprocessing or inference boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("unknown category '{value}' for column '{column}' (known: {known})")]
    UnknownCategory {
        column: String,
        value: String,
        known: String,
    },

    #[error("{field} = {value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("malformed value for {field}: {reason}")]
    Malformed { field: String, reason: String },

    #[error("dataset header mismatch: expected [{expected}], found [{found}]")]
    SchemaMismatch { expected: String, found: String },

    #[error("column '{0}' has no values to compute a mean from")]
    EmptyColumn(&'static str),

    #[error("feature '{0}' has zero variance; scaling is undefined")]
    ConstantFeature(&'static str),

    #[error("expected {expected} feature columns, got {found}")]
    FeatureWidth { expected: usize, found: usize },

    #[error("no rows to process")]
    Empty,
}

impl DataError {
    /// Short hint shown to the user next to the rejection.
    pub fn guidance(&self) -> &'static str {
        match self {
            DataError::UnknownCategory { .. } => {
                "Pick one of the listed values; the model only knows categories seen during training."
            }
            DataError::OutOfRange { .. } => "Adjust the value so it falls inside the allowed range.",
            DataError::Malformed { .. } => "Please ensure all fields are filled correctly.",
            _ => "Check the input data and try again.",
        }
    }
}

/// Dataset generation and CSV I/O failures.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid generator parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single candidate classifier that could not be fit.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{model} failed to fit: {reason}")]
pub struct CandidateFailure {
    pub model: String,
    pub reason: String,
}

/// Fatal training-run errors.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("target must have exactly two classes, found {0}")]
    NotBinary(usize),

    #[error("class '{class}' has {count} rows; stratified split needs at least 2")]
    InsufficientData { class: String, count: usize },

    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),

    #[error("no candidate classifier could be fit ({} failed)", .0.len())]
    NoCandidates(Vec<CandidateFailure>),
}

/// Loading or persisting the artifact bundle.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("missing artifact files in {}: {}", dir.display(), files.join(", "))]
    Missing { dir: PathBuf, files: Vec<String> },

    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact bundle is inconsistent: {0}")]
    Mismatch(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArtifactError {
    pub fn is_missing(&self) -> bool {
        matches!(self, ArtifactError::Missing { .. })
    }
}
