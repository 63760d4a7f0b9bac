//! Central Configuration Constants
//!
//! Single source of truth for pipeline defaults.
//! CLI flags and the server fall back to these values.

use std::path::PathBuf;

/// Default dataset location (written by `generate`, read by `train`)
pub const DEFAULT_DATASET_PATH: &str = "data/student_data.csv";

/// Default artifact directory (written by `train`, read by the predictor)
pub const DEFAULT_ARTIFACT_DIR: &str = "models";

/// Default number of synthetic records
pub const DEFAULT_RECORD_COUNT: usize = 600;

/// Default random seed for generation, splitting and model fitting
pub const DEFAULT_SEED: u64 = 42;

/// Default held-out fraction for model selection
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Student Performance Predictor";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get dataset path from environment or use default
pub fn get_dataset_path() -> PathBuf {
    std::env::var("DATASET_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATASET_PATH))
}

/// Get artifact directory from environment or use default
pub fn get_artifact_dir() -> PathBuf {
    std::env::var("ARTIFACT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ARTIFACT_DIR))
}

/// Get training seed from environment or use default
pub fn get_seed() -> u64 {
    std::env::var("PREDICTOR_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED)
}
