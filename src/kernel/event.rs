//! Terminate Event
//!
//! Emitted once per request after its response has left the server.

use axum::http::{Method, StatusCode, Uri};

use crate::upload::FileBag;

// == Terminate Event ==
/// Snapshot of a finished request handed to terminate listeners.
#[derive(Debug, Clone)]
pub struct TerminateEvent {
    /// Request method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Response status, `None` if the request was abandoned before a response existed
    pub status: Option<StatusCode>,
    /// Uploads recorded while handling the request
    pub files: FileBag,
}

impl TerminateEvent {
    pub fn new(method: Method, uri: Uri, status: Option<StatusCode>, files: FileBag) -> Self {
        Self {
            method,
            uri,
            status,
            files,
        }
    }

    /// Builds an event carrying only an upload collection.
    pub fn for_files(files: FileBag) -> Self {
        Self::new(Method::GET, Uri::from_static("/"), None, files)
    }
}
