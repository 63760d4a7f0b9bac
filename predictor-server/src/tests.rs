//! Router tests against the real handlers

use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
};
use tower::ServiceExt;

use predictor_core::logic::dataset::{generate, DatasetRow, GeneratorConfig};
use predictor_core::{train, ModelKind, Predictor, TrainingConfig};

use crate::config::Config;
use crate::state::PredictorState;
use crate::{create_router, AppState};

fn trained_predictor() -> Arc<Predictor> {
    static PREDICTOR: OnceLock<Arc<Predictor>> = OnceLock::new();
    PREDICTOR
        .get_or_init(|| {
            let rows: Vec<DatasetRow> = generate(&GeneratorConfig::default())
                .unwrap()
                .iter()
                .map(DatasetRow::from)
                .collect();
            let config = TrainingConfig::default()
                .with_candidates(vec![ModelKind::LogisticRegression]);
            Arc::new(Predictor::new(train(&rows, &config).unwrap()).unwrap())
        })
        .clone()
}

fn ready_state() -> AppState {
    AppState {
        predictor: PredictorState::Ready(trained_predictor()),
        config: Config::default(),
    }
}

fn disabled_state() -> AppState {
    AppState {
        predictor: PredictorState::Disabled {
            reason: "missing artifact files in models: best_model.json".to_string(),
        },
        config: Config::default(),
    }
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_request(body: &str) -> Request<Body> {
    Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const PASS_FORM: &str = "gender=Male&age=21&attendance_percentage=90&hours_studied=20\
    &previous_score=80&parent_education=Master%27s&internet_access=Yes\
    &assignments_submitted=9&internal_marks=35";

#[tokio::test]
async fn health_reports_model_state() {
    let response = create_router(disabled_state())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], false);
}

#[tokio::test]
async fn index_shows_placeholder_when_disabled() {
    let response = create_router(disabled_state())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Model not available"));
    assert!(html.contains("predictor train"));
    assert!(!html.contains("<form"));
}

#[tokio::test]
async fn submit_while_disabled_is_unavailable() {
    let response = create_router(disabled_state())
        .oneshot(form_request(PASS_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_text(response).await.contains("Model not available"));
}

#[tokio::test]
async fn api_while_disabled_is_503() {
    let body = serde_json::to_value(crate::models::StudentForm::default()).unwrap();
    let response = create_router(disabled_state())
        .oneshot(json_request("/api/v1/predict", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], 503);
}

#[tokio::test]
async fn api_while_disabled_ignores_body_errors() {
    let body = serde_json::json!({ "gender": "Male", "age": 21 });
    let response = create_router(disabled_state())
        .oneshot(json_request("/api/v1/predict", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn api_incomplete_body_returns_json_error() {
    let body = serde_json::json!({ "gender": "Male", "age": 21 });
    let response = create_router(ready_state())
        .oneshot(json_request("/api/v1/predict", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/json"), "{content_type}");

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().contains("missing field"));
    assert_eq!(json["guidance"], "Please ensure all fields are filled correctly.");
}

#[tokio::test]
async fn api_blank_category_is_rejected() {
    let mut body = serde_json::to_value(crate::models::StudentForm::default()).unwrap();
    body["gender"] = serde_json::Value::String(String::new());
    let response = create_router(ready_state())
        .oneshot(json_request("/api/v1/predict", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn index_renders_form_when_ready() {
    let response = create_router(ready_state())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("<form method=\"post\" action=\"/predict\">"));
    assert!(html.contains("Logistic Regression"));
}

#[tokio::test]
async fn form_submit_renders_result() {
    let response = create_router(ready_state())
        .oneshot(form_request(PASS_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Prediction: Pass"));
    assert!(html.contains("Input Summary"));
    assert!(html.contains("Master&#39;s"));
}

#[tokio::test]
async fn form_submit_with_unknown_category_shows_error() {
    let body = PASS_FORM.replace("Master%27s", "Unknown");
    let response = create_router(ready_state())
        .oneshot(form_request(&body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("Prediction failed"));
    assert!(html.contains("unknown category"));
}

#[tokio::test]
async fn form_submit_out_of_range_shows_error() {
    let body = PASS_FORM.replace("age=21", "age=40");
    let response = create_router(ready_state())
        .oneshot(form_request(&body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("must be between 18 and 25"));
}

#[tokio::test]
async fn form_submit_with_garbage_number_is_handled() {
    let body = PASS_FORM.replace("hours_studied=20", "hours_studied=lots");
    let response = create_router(ready_state())
        .oneshot(form_request(&body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Prediction failed"));
}

#[tokio::test]
async fn api_predict_returns_probabilities() {
    let body = serde_json::json!({
        "gender": "Female",
        "age": 19,
        "attendance_percentage": 20.0,
        "hours_studied": 1.0,
        "previous_score": 25.0,
        "parent_education": "High School",
        "internet_access": "No",
        "assignments_submitted": 1,
        "internal_marks": 5.0
    });
    let response = create_router(ready_state())
        .oneshot(json_request("/api/v1/predict", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["predicted_class"], "Fail");
    let pass = json["pass_probability"].as_f64().unwrap();
    let fail = json["fail_probability"].as_f64().unwrap();
    assert!((pass + fail - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn api_model_summarizes_manifest() {
    let response = create_router(ready_state())
        .oneshot(Request::get("/api/v1/model").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["model_name"], "Logistic Regression");
    assert_eq!(json["feature_names"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn about_page_renders() {
    let response = create_router(ready_state())
        .oneshot(Request::get("/about").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Gradient Boosting"));
}
