//! HTTP error mapping.
//!
//! Every failure becomes `{"detail": message}` with a status derived from
//! the engine error kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use cropcast_core::ForecastError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No trained model for the pair (404).
    #[error("{0}")]
    NotFound(String),

    /// Bad parameters or an unforecastable pair (400).
    #[error("{0}")]
    BadRequest(String),

    /// Registry failure or a broken model (500).
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        let message = err.to_string();
        match err {
            ForecastError::UnknownCombination { .. } => ApiError::NotFound(message),
            e if e.is_client_error() => ApiError::BadRequest(message),
            _ => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), %detail, "request failed");
        } else {
            warn!(status = status.as_u16(), %detail, "request rejected");
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
