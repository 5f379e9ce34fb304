//! API Routes
//!
//! Configures the Axum router with the upload service endpoints.

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, upload_handler, AppState};
use super::middleware::terminate_middleware;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /upload` - Spool multipart file fields
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Terminate: Owns the request's uploads and runs terminate listeners
///   once the response body has been sent
/// - Body limit: Rejects request bodies above `max_body_bytes`
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/upload", post(upload_handler))
        .route("/health", get(health_handler))
        .layer(from_fn_with_state(state.clone(), terminate_middleware))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
