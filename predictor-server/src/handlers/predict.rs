//! Prediction handlers - HTML form and JSON API

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    response::Html,
    Form, Json,
};
use validator::Validate;

use predictor_core::{Prediction, StudentFeatures};

use crate::models::StudentForm;
use crate::state::PredictorState;
use crate::views::{self, Outcome};
use crate::{AppError, AppResult, AppState};

fn disabled(state: &AppState, reason: &str) -> Html<String> {
    let detail = (!state.config.is_production()).then_some(reason);
    Html(views::disabled_page(detail))
}

/// Validate, then run the shared predictor
fn run(state: &AppState, form: &StudentForm) -> AppResult<Prediction> {
    form.validate()?;
    let predictor = state.predictor.predictor()?;
    let features = StudentFeatures::from(form.clone());
    Ok(predictor.predict(&features)?)
}

/// GET / - empty form, or the placeholder when no model is loaded
pub async fn index(State(state): State<AppState>) -> Html<String> {
    match &state.predictor {
        PredictorState::Ready(p) => Html(views::predictor_page(
            &StudentForm::default(),
            Outcome::None,
            p.model_name(),
        )),
        PredictorState::Disabled { reason } => disabled(&state, reason),
    }
}

/// POST /predict - urlencoded form submit
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<StudentForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let model_name = match &state.predictor {
        PredictorState::Ready(p) => p.model_name(),
        PredictorState::Disabled { reason } => {
            return (StatusCode::SERVICE_UNAVAILABLE, disabled(&state, reason));
        }
    };

    let values = match form {
        Ok(Form(values)) => values,
        Err(rejection) => {
            tracing::debug!("Form rejected: {}", rejection);
            let outcome = Outcome::Error {
                message: "Some fields are missing or not numbers.".to_string(),
                guidance: "Please ensure all fields are filled correctly.",
            };
            let page = views::predictor_page(&StudentForm::default(), outcome, model_name);
            return (StatusCode::BAD_REQUEST, Html(page));
        }
    };

    match run(&state, &values) {
        Ok(prediction) => {
            tracing::info!(
                "Predicted {} (pass={:.3}) with {}",
                prediction.predicted_class,
                prediction.pass_probability,
                prediction.model_name
            );
            let page = views::predictor_page(&values, Outcome::Prediction(&prediction), model_name);
            (StatusCode::OK, Html(page))
        }
        Err(e) => {
            tracing::info!("Prediction rejected: {}", e);
            let outcome = Outcome::Error {
                message: e.to_string(),
                guidance: e.guidance(),
            };
            let page = views::predictor_page(&values, outcome, model_name);
            (e.status(), Html(page))
        }
    }
}

/// POST /api/v1/predict - JSON in, JSON out
pub async fn api(
    State(state): State<AppState>,
    body: Result<Json<StudentForm>, JsonRejection>,
) -> AppResult<Json<Prediction>> {
    state.predictor.predictor()?;
    let Json(form) = body.map_err(|rejection| {
        tracing::debug!("JSON body rejected: {}", rejection);
        AppError::ValidationError(rejection.body_text())
    })?;
    run(&state, &form).map(Json)
}
