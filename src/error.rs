//! Error types for the upload service
//!
//! Provides unified error handling using thiserror. The terminate hook itself
//! never produces these: cleanup failures are swallowed.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Upload Error Enum ==
/// Unified error type for the upload service.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Malformed multipart payload
    #[error("Invalid multipart payload: {0}")]
    Multipart(#[from] MultipartError),

    /// Upload larger than the configured limit
    #[error("Upload exceeds maximum size of {0} bytes")]
    TooLarge(usize),

    /// Raw upload collection could not be decoded
    #[error("Invalid upload descriptor: {0}")]
    InvalidDescriptor(String),

    /// Filesystem error while spooling an upload
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tempfile::PathPersistError> for UploadError {
    fn from(err: tempfile::PathPersistError) -> Self {
        UploadError::Io(err.error)
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = match &self {
            UploadError::Multipart(err) => err.status(),
            UploadError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::InvalidDescriptor(_) => StatusCode::BAD_REQUEST,
            UploadError::Io(_) | UploadError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the upload service.
pub type Result<T> = std::result::Result<T, UploadError>;
