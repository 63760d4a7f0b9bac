//! Predictor loading

use std::path::Path;
use std::sync::Arc;

use predictor_core::{ArtifactError, Predictor};

use crate::AppError;

/// Predictor availability, decided once at startup
#[derive(Clone)]
pub enum PredictorState {
    Ready(Arc<Predictor>),
    /// Artifacts missing or unusable; the UI renders a placeholder
    Disabled { reason: String },
}

impl PredictorState {
    /// Load the bundle in `dir`. Failures disable prediction, they never
    /// stop the server.
    pub fn load(dir: &Path) -> Self {
        match Predictor::load(dir) {
            Ok(predictor) => {
                tracing::info!(
                    "Predictor ready: {} (trained {})",
                    predictor.model_name(),
                    predictor.manifest().created_at.to_rfc3339()
                );
                PredictorState::Ready(Arc::new(predictor))
            }
            Err(e @ ArtifactError::Missing { .. }) => {
                tracing::warn!("Predictor disabled: {}", e);
                PredictorState::Disabled { reason: e.to_string() }
            }
            Err(e) => {
                tracing::error!("Predictor disabled, artifacts unusable: {}", e);
                PredictorState::Disabled { reason: e.to_string() }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PredictorState::Ready(_))
    }

    pub fn predictor(&self) -> Result<&Arc<Predictor>, AppError> {
        match self {
            PredictorState::Ready(p) => Ok(p),
            PredictorState::Disabled { reason } => Err(AppError::ModelUnavailable(reason.clone())),
        }
    }
}
