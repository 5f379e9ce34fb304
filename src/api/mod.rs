//! API Module
//!
//! HTTP handlers, routing and the terminate middleware of the upload service.
//!
//! # Endpoints
//! - `POST /upload` - Spool multipart file fields to temporary files
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::{terminate_middleware, RequestFiles};
pub use routes::create_router;
