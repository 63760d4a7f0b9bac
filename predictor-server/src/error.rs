//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

use predictor_core::DataError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // Input errors
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    InvalidInput(#[from] DataError),

    // Predictor errors
    #[error("model not available: {0}")]
    ModelUnavailable(String),

    // Generic errors
    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Hint shown next to the message
    pub fn guidance(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "Please ensure all fields are filled correctly.",
            AppError::InvalidInput(e) => e.guidance(),
            AppError::ModelUnavailable(_) => "Run `predictor train` to create the model artifacts, then restart the server.",
            AppError::InternalError(_) => "Try again later.",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .next()
                    .unwrap_or_else(|| "invalid value".to_string());
                format!("{}: {}", field, detail)
            })
            .collect();
        fields.sort();
        AppError::ValidationError(fields.join("; "))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::ModelUnavailable(reason) => {
                tracing::warn!("Prediction requested while disabled: {}", reason);
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "guidance": self.guidance(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let data = AppError::from(DataError::Empty);
        assert_eq!(data.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::ModelUnavailable("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let response = AppError::InternalError("secret path".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
