//! HTTP-facing error type and its JSON envelope.
//!
//! Core errors are translated here:
//!
//! | Core error                 | Status | `code`                |
//! |----------------------------|--------|-----------------------|
//! | invalid input              | 400    | `validation_error`    |
//! | `NotFound`                 | 404    | `not_found`           |
//! | counter / store unavailable| 503    | `service_unavailable` |
//! | collision limit, encoding  | 500    | `internal_error`      |

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;
use validator::ValidationErrors;

use crate::application::services::{ResolveError, ShortenError};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Unavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Unavailable { message, details } => {
                ("service_unavailable", message, details)
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::bad_request(
            "Validation failed",
            serde_json::to_value(&errors).unwrap_or(Value::Null),
        )
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid JSON body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<ShortenError> for AppError {
    fn from(e: ShortenError) -> Self {
        match e {
            ShortenError::CounterUnavailable(e) => {
                error!(error = %e, "Shorten failed: counter unavailable");
                AppError::unavailable("Counter service unavailable", json!({}))
            }
            ShortenError::StoreUnavailable(e) => {
                error!(error = %e, "Shorten failed: store unavailable");
                AppError::unavailable("Storage unavailable", json!({}))
            }
            ShortenError::Encode(e) => {
                error!(error = %e, "Shorten failed: encoding error");
                AppError::internal("Failed to encode shortcode", json!({}))
            }
            ShortenError::CollisionLimitExceeded { attempts } => AppError::internal(
                "Failed to allocate a unique shortcode",
                json!({ "attempts": attempts }),
            ),
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound(shortcode) => {
                AppError::not_found("Short link not found", json!({ "shortcode": shortcode }))
            }
            ResolveError::StoreUnavailable(e) => {
                error!(error = %e, "Resolve failed: store unavailable");
                AppError::unavailable("Storage unavailable", json!({}))
            }
        }
    }
}
