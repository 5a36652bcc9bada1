use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::SupportedFormat;

/// Failure of a single conversion call.
///
/// Every engine failure is one of these four kinds. None of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Missing file or format data: {0}")]
    MissingInput(&'static str),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid quality: {0} (expected an integer from 1 to 100)")]
    InvalidQuality(String),

    #[error("Conversion failed")]
    ConversionFailed,
}

impl ConversionError {
    /// True for failures caused by the caller's input
    pub fn is_validation(&self) -> bool {
        !matches!(self, ConversionError::ConversionFailed)
    }
}

/// Error reported by the codec adapter. Never leaves the engine.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("{format} encode error: {message}")]
    Encode {
        format: SupportedFormat,
        message: String,
    },
}

impl CodecError {
    pub fn encode(format: SupportedFormat, message: impl ToString) -> Self {
        CodecError::Encode {
            format,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid form data: {0}")]
    BadForm(String),

    #[error("Upload exceeds the {0} byte limit")]
    TooLarge(usize),

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Page error: {0}")]
    Page(#[from] crate::services::PageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadForm(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::TooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Conversion(e) if e.is_validation() => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Conversion(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Page(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
