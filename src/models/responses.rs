//! Response DTOs for the upload service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::upload::UploadedFile;

/// Summary of one file received by POST /upload
///
/// Temporary paths are deliberately not exposed.
#[derive(Debug, Clone, Serialize)]
pub struct ReceivedFile {
    /// Form field name as sent, e.g. `files[group][avatar]`
    pub field: String,
    /// Client-provided file name
    pub file_name: String,
    /// Client-provided MIME type
    pub content_type: Option<String>,
    /// Size in bytes
    pub size: u64,
}

impl ReceivedFile {
    /// Creates a summary for a spooled upload
    pub fn new(field: impl Into<String>, file: &UploadedFile) -> Self {
        Self {
            field: field.into(),
            file_name: file.client_name().to_string(),
            content_type: file.mime_type().map(str::to_string),
            size: file.size(),
        }
    }
}

/// Response body for POST /upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    /// Number of files received
    pub count: usize,
    /// One summary per received file, in upload order
    pub files: Vec<ReceivedFile>,
}

impl UploadResponse {
    /// Creates a new UploadResponse
    pub fn new(files: Vec<ReceivedFile>) -> Self {
        Self {
            count: files.len(),
            files,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_serialize() {
        let file = UploadedFile::new(
            "/tmp/upload-abc",
            "photo.png",
            Some("image/png".to_string()),
            42,
        );
        let resp = UploadResponse::new(vec![ReceivedFile::new("files[avatar]", &file)]);
        let json = serde_json::to_string(&resp).unwrap();

        assert!(json.contains("\"count\":1"));
        assert!(json.contains("files[avatar]"));
        assert!(json.contains("photo.png"));
        assert!(!json.contains("/tmp/upload-abc"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
