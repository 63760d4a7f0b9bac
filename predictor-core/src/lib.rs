//! Student Performance Predictor - core library
//!
//! Synthetic dataset generation, preprocessing, candidate classifiers,
//! model selection, artifact persistence and single-student inference.

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{ArtifactError, CandidateFailure, DataError, DatasetError, TrainingError};
pub use logic::artifacts::ArtifactBundle;
pub use logic::features::{FinalResult, Gender, InternetAccess, ParentEducation, StudentFeatures};
pub use logic::model::{ModelKind, Prediction, Predictor};
pub use logic::training::{train, TrainingConfig};
