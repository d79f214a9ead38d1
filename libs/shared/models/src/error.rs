use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-level failures surfaced by the HTTP handlers.
///
/// Domain misses (unknown doctor, taken slot, unparseable date) are not
/// errors; they travel as outcome text with a 200.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Database(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &str {
        match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg,
            AppError::Database(_) => "An unexpected server error occurred.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("{}: {}", status, self);
        } else {
            tracing::debug!("{}: {}", status, self);
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
