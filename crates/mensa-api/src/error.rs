//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps engine errors to HTTP status codes and JSON error bodies with a
//! machine-readable code. Internal error details are logged but never
//! exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use mensa_core::MensaError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// A check run is already in flight for the key (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned
    /// to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The HTTP status code and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Conflict(_) => tracing::info!(error = %self, "conflicting check run"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Map engine errors onto the HTTP taxonomy.
///
/// Integrity and persistence failures are server-side defects (500);
/// the remaining variants are caller-visible conditions.
impl From<MensaError> for AppError {
    fn from(err: MensaError) -> Self {
        match err {
            MensaError::NotFound { .. } => Self::NotFound(err.to_string()),
            MensaError::Conflict(_) => Self::Conflict(err.to_string()),
            MensaError::Validation(_) => Self::Validation(err.to_string()),
            MensaError::Integrity(_)
            | MensaError::Persistence(_)
            | MensaError::Canonicalization(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<mensa_core::ValidationError> for AppError {
    fn from(err: mensa_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
