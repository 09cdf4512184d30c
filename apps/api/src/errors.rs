use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::gemini::GeminiError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every failure in the analysis pipeline is classified into exactly one of
/// these kinds at the client boundary; handlers and the presentation layer
/// never see raw transport errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("GEMINI_API_KEY is not configured")]
    MissingCredential,

    #[error("Capability rejected the API key: {0}")]
    InvalidCredential(String),

    #[error("Payload too large: {size_mb:.2}MB")]
    PayloadTooLarge { size_mb: f64 },

    #[error("Capability quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Capability response is not JSON: {0}")]
    MalformedResponse(String),

    #[error("Capability response is missing required fields: {0}")]
    IncompleteResponse(String),

    #[error("Capability unreachable: {0}")]
    NetworkFailure(String),

    #[error("Capability call exceeded its deadline")]
    Timeout,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "MISSING_CREDENTIAL",
                "The AI credential is not configured. Set GEMINI_API_KEY in the service environment."
                    .to_string(),
            ),
            AppError::InvalidCredential(msg) => {
                tracing::error!("Capability rejected credential: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INVALID_CREDENTIAL",
                    format!("The AI credential was rejected: {msg}. Verify GEMINI_API_KEY."),
                )
            }
            AppError::PayloadTooLarge { size_mb } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                format!(
                    "File too large ({size_mb:.2}MB). The limit is 3MB; resize or compress the file and retry."
                ),
            ),
            AppError::QuotaExceeded(msg) => {
                tracing::warn!("Capability quota exceeded: {msg}");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "QUOTA_EXCEEDED",
                    "The AI service usage limit has been reached. Please try again later."
                        .to_string(),
                )
            }
            // Raw response goes to the log for diagnostics, never to the user.
            AppError::MalformedResponse(raw) => {
                tracing::error!("Malformed capability response: {raw}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MALFORMED_RESPONSE",
                    "Analysis failed, please retry.".to_string(),
                )
            }
            AppError::IncompleteResponse(raw) => {
                tracing::error!("Incomplete capability response: {raw}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INCOMPLETE_RESPONSE",
                    "Analysis failed, please retry.".to_string(),
                )
            }
            AppError::NetworkFailure(msg) => {
                tracing::error!("Capability unreachable: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNREACHABLE",
                    "Could not reach the AI service. Check your connection and retry.".to_string(),
                )
            }
            AppError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "TIMEOUT",
                "Analysis timed out. Try a smaller file or a simpler document.".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Classification boundary: transport-level failures become exactly one
/// user-facing kind here.
impl From<GeminiError> for AppError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::MissingCredential => AppError::MissingCredential,
            GeminiError::InvalidCredential(msg) => AppError::InvalidCredential(msg),
            GeminiError::Quota(msg) => AppError::QuotaExceeded(msg),
            GeminiError::Timeout => AppError::Timeout,
            GeminiError::Network(msg) => AppError::NetworkFailure(msg),
            GeminiError::EmptyContent => {
                AppError::MalformedResponse("response contained no text part".to_string())
            }
            GeminiError::Api { status, message } => {
                AppError::Internal(anyhow::anyhow!("capability error (status {status}): {message}"))
            }
        }
    }
}
