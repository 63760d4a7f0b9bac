//! Student Performance Predictor - web server
//!
//! Serves the prediction form, an about page and a small JSON API on top of
//! the artifact bundle written by `predictor train`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  PREDICTOR SERVER (Axum)                  │
//! ├──────────────────────────────────────────────────────────┤
//! │  GET  /            form page / disabled placeholder       │
//! │  POST /predict     form submit → result page              │
//! │  GET  /about       about page                             │
//! │  GET  /health      liveness + model_loaded                │
//! │  POST /api/v1/predict, GET /api/v1/model   JSON           │
//! │                       │                                   │
//! │                       ▼                                   │
//! │            Arc<Predictor> (read-only)                     │
//! │                       │                                   │
//! │                       ▼                                   │
//! │            models/  (artifact bundle)                     │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;
mod state;
mod views;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
use state::PredictorState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (also captures `log` records from predictor-core)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "predictor_server=debug,predictor_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!(
        "{} v{} starting ({})",
        predictor_core::constants::APP_NAME,
        env!("CARGO_PKG_VERSION"),
        config.environment
    );
    tracing::info!("Artifacts: {}", config.artifact_dir.display());

    // Load the predictor once; a missing bundle only disables prediction
    let predictor = PredictorState::load(&config.artifact_dir);

    let state = AppState {
        predictor,
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: PredictorState,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Pages
    let pages = Router::new()
        .route("/", get(handlers::predict::index))
        .route("/predict", post(handlers::predict::submit))
        .route("/about", get(handlers::about::page));

    // JSON API
    let api = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::predict::api))
        .route("/api/v1/model", get(handlers::model::info));

    Router::new()
        .merge(pages)
        .merge(api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
