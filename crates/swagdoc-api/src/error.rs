//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Access refusals keep the status chosen by a permission-denied hook;
//! everything else maps to a fixed status code and a JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use swagdoc_gen::AccessError;
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "FORBIDDEN").
    pub code: String,
    pub message: String,
}

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// No resource of that name (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller may not read the documentation (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A permission-denied hook answered with its own status.
    #[error("{message}")]
    Handled { status: StatusCode, message: String },

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Handled { status, .. } => (*status, "ACCESS_DENIED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::PermissionDenied { .. } => Self::Forbidden(err.to_string()),
            AccessError::Handled { status, message } => match StatusCode::from_u16(status) {
                Ok(status) => Self::Handled { status, message },
                Err(_) => Self::Internal(format!("hook answered with invalid status {status}")),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}
