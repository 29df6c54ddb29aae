use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use releasetracker_core::error::CoreError;
use releasetracker_core::release::field_messages;
use serde::Serialize;
use validator::ValidationErrors;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `releasetracker_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Field-level validation of a request body failed.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A bad request with a short error tag and a human-readable message.
    #[error("{error}: {message}")]
    BadRequest {
        error: &'static str,
        message: String,
    },
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// JSON error body returned for every failure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub status: u16,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,
}

impl AppError {
    pub fn bad_request(error: &'static str, message: impl Into<String>) -> Self {
        AppError::BadRequest {
            error,
            message: message.into(),
        }
    }

    /// A date that is not `yyyy-MM-dd`.
    pub fn invalid_date() -> Self {
        AppError::bad_request(
            "Invalid date format",
            "Release date must be in format yyyy-MM-dd",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut field_errors = None;

        let (status, error, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "Not Found", core.to_string())
                }
                CoreError::DuplicateName(_) => {
                    (StatusCode::CONFLICT, "Conflict", core.to_string())
                }
                CoreError::UnknownStatus(_) => {
                    (StatusCode::BAD_REQUEST, "Invalid status", core.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "Invalid parameter", msg.clone())
                }
                CoreError::Store(msg) => {
                    tracing::error!(error = %msg, "Release store error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal Server Error",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Request contract errors ---
            AppError::Validation(errors) => {
                field_errors = Some(field_messages(errors));
                (
                    StatusCode::BAD_REQUEST,
                    "Validation failed",
                    "One or more fields are invalid".to_string(),
                )
            }
            AppError::BadRequest { error, message } => {
                (StatusCode::BAD_REQUEST, *error, message.clone())
            }
        };

        let body = ErrorBody {
            timestamp: chrono::Utc::now(),
            status: status.as_u16(),
            error,
            message,
            field_errors,
        };

        (status, axum::Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Extractor rejections
// ---------------------------------------------------------------------------

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match &rejection {
            JsonRejection::JsonDataError(err) if err.body_text().contains("releaseDate") => {
                AppError::invalid_date()
            }
            _ => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                AppError::bad_request(
                    "Malformed request",
                    "Request body is not valid JSON or has invalid fields",
                )
            }
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected path parameter");
        AppError::bad_request("Invalid parameter", "Invalid UUID format")
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request("Invalid parameter", rejection.body_text())
    }
}
