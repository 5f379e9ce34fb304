//! API Handlers
//!
//! HTTP request handlers for the upload service endpoints.

use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, State},
    Extension, Json,
};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::api::RequestFiles;
use crate::config::Config;
use crate::error::{Result, UploadError};
use crate::kernel::{EventDispatcher, RequestFileCleanBundle};
use crate::models::{HealthResponse, ReceivedFile, UploadResponse};
use crate::upload::UploadedFile;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Terminate listeners, frozen once the router is built
    pub dispatcher: Arc<EventDispatcher>,
    /// Server configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState with the given dispatcher.
    pub fn new(config: Config, dispatcher: EventDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            config: Arc::new(config),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Registers the request file clean bundle unless it is disabled.
    pub fn from_config(config: Config) -> Self {
        let mut dispatcher = EventDispatcher::new();
        if config.clean_enabled {
            dispatcher.register_bundle(&RequestFileCleanBundle);
        }
        Self::new(config, dispatcher)
    }
}

/// Handler for POST /upload
///
/// Spools every file field into a temporary file and records it in the
/// request's upload collection. Fields without a file name are ignored.
pub async fn upload_handler(
    State(state): State<AppState>,
    Extension(files): Extension<RequestFiles>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut received = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_none() {
            continue;
        }

        let file = spool_field(field, &state.config).await?;
        received.push(ReceivedFile::new(&field_name, &file));
        files.insert(&field_name, file);
    }

    info!("Received {} uploaded files", received.len());
    Ok(Json(UploadResponse::new(received)))
}

/// Writes one multipart field into a fresh temporary file.
///
/// The file is removed right away if the field is too large or the stream
/// fails; otherwise it is left for the terminate hook.
async fn spool_field(mut field: Field<'_>, config: &Config) -> Result<UploadedFile> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let limit = config.max_upload_bytes;

    let (file, temp_path) = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(&config.upload_dir)?
        .into_parts();
    let mut file = tokio::fs::File::from_std(file);

    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        size += chunk.len() as u64;
        if size > limit as u64 {
            return Err(UploadError::TooLarge(limit));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    let path = temp_path.keep()?;
    debug!("Spooled {} ({} bytes) to {}", file_name, size, path.display());

    Ok(UploadedFile::new(path, file_name, content_type, size))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_state_registers_bundle_when_enabled() {
        let state = AppState::from_config(Config::default());
        assert!(state.dispatcher.has_bundle(RequestFileCleanBundle::ALIAS));
    }

    #[test]
    fn test_state_skips_bundle_when_disabled() {
        let config = Config {
            clean_enabled: false,
            ..Config::default()
        };
        let state = AppState::from_config(config);
        assert!(!state.dispatcher.has_bundle(RequestFileCleanBundle::ALIAS));
        assert!(state.dispatcher.listeners().is_empty());
    }
}
