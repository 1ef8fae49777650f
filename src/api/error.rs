use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::PowerverseError;

/// HTTP-facing error wrapper around [`PowerverseError`].
///
/// Implements [`IntoResponse`] so handlers can return `ApiResult<T>` and get
/// a consistent `{"error": ..., "code": ...}` JSON body on failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] PowerverseError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Domain(domain) => match domain {
                PowerverseError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                PowerverseError::NotFound(msg) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone())
                }
                PowerverseError::SchemaMismatch(msg) => {
                    tracing::error!(error = %msg, "Feature schema mismatch");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "SCHEMA_MISMATCH",
                        msg.clone(),
                    )
                }
                PowerverseError::Model(msg) => {
                    tracing::error!(error = %msg, "Model error");
                    (StatusCode::INTERNAL_SERVER_ERROR, "MODEL_ERROR", msg.clone())
                }
                other => {
                    tracing::error!(error = %other, "Internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
