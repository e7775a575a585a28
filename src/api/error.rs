//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::PipelineError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Text input cannot be empty.")]
    EmptyText,
    #[error("Request must contain either 'text' or 'image' data.")]
    MissingInput,
    #[error("No image file provided.")]
    EmptyImage,
    #[error("Could not extract text from image. The image might be empty or unreadable.")]
    OcrFailed,
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Request body is too large.")]
    PayloadTooLarge,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Map an extractor rejection, keeping the size-limit case distinct.
    pub fn rejected(status: StatusCode, detail: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(detail)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::EmptyText => (StatusCode::BAD_REQUEST, "EMPTY_TEXT", self.to_string()),
            ApiError::MissingInput => (StatusCode::BAD_REQUEST, "MISSING_INPUT", self.to_string()),
            ApiError::EmptyImage => (StatusCode::BAD_REQUEST, "EMPTY_IMAGE", self.to_string()),
            ApiError::OcrFailed => (StatusCode::BAD_REQUEST, "OCR_FAILED", self.to_string()),
            ApiError::Pipeline(PipelineError::NoTestLines) => {
                (StatusCode::BAD_REQUEST, "NO_TEST_LINES", self.to_string())
            }
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                self.to_string(),
            ),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = ErrorBody {
            status: "error",
            code,
            message,
        };
        (status, Json(body)).into_response()
    }
}
