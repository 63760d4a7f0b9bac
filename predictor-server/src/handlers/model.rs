//! Model info handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use predictor_core::logic::model::{CandidateReport, Metrics};
use predictor_core::CandidateFailure;

use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub metrics: Metrics,
    pub candidates: Vec<CandidateReport>,
    pub skipped: Vec<CandidateFailure>,
    pub layout_version: u8,
    pub layout_hash: String,
    pub feature_names: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub seed: u64,
    pub trained_at: DateTime<Utc>,
}

/// Summary of the loaded bundle's manifest
pub async fn info(State(state): State<AppState>) -> AppResult<Json<ModelInfo>> {
    let predictor = state.predictor.predictor()?;
    let m = predictor.manifest();

    Ok(Json(ModelInfo {
        model_name: m.model_name.clone(),
        metrics: m.metrics,
        candidates: m.candidates.clone(),
        skipped: m.skipped.clone(),
        layout_version: m.layout.version,
        layout_hash: format!("{:08x}", m.layout.hash),
        feature_names: m.layout.feature_names.clone(),
        train_rows: m.train_rows,
        test_rows: m.test_rows,
        seed: m.seed,
        trained_at: m.created_at,
    }))
}
