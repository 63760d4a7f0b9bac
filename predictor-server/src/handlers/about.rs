//! About page handler

use axum::{extract::State, response::Html};

use crate::state::PredictorState;
use crate::{views, AppState};

pub async fn page(State(state): State<AppState>) -> Html<String> {
    let model_name = match &state.predictor {
        PredictorState::Ready(p) => Some(p.model_name()),
        PredictorState::Disabled { .. } => None,
    };
    Html(views::about_page(model_name))
}
