//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Each variant carries the client-facing message verbatim and converts to a
/// `{"status": "fail", "message": ...}` response via `IntoResponse`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Payload is missing, incomplete, mistyped or violates a field constraint
    #[error("{0}")]
    Validation(String),

    /// Book with the given ID was not found
    #[error("{0}")]
    NotFound(String),

    /// A write did not leave the store in the expected state
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "status": "fail",
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
