//! HTTP error types.
//!
//! Maps domain errors from `toolbelt-core` and `toolbelt-store` into HTTP
//! responses. Every error produces a JSON body with a machine-readable
//! `error` field and a human-readable `message`. Integrity and storage
//! failures are logged and never retried — retrying a failed decrypt
//! cannot succeed without new input.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use toolbelt_core::error::{TemplateError, VaultError};
use toolbelt_store::StoreError;

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Requested resource not found.
    NotFound(String),
    /// Client sent invalid input (missing fields, missing required variables).
    Validation(String),
    /// A stored secret failed its authentication check.
    Integrity(String),
    /// Internal server error (storage, crypto on the write path).
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            Self::Integrity(msg) => {
                tracing::error!(error = %msg, "secret integrity failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "integrity_error", msg)
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_owned(),
                )
            }
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<VaultError> for AppError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::Integrity { .. } => Self::Integrity(err.to_string()),
            VaultError::Crypto(_) | VaultError::Store(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        Self::Validation(err.to_string())
    }
}
