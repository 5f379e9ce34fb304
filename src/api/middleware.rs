//! Terminate Middleware
//!
//! Gives every request its own upload collection and fires the terminate
//! event once the response body is gone.

use std::mem;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use axum::{
    body::{Body, BodyDataStream, Bytes},
    extract::{Request, State},
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use futures::Stream;
use tracing::debug;

use crate::api::AppState;
use crate::kernel::{EventDispatcher, TerminateEvent};
use crate::upload::{FileBag, UploadEntry};

// == Request Files ==
/// Shared handle on the upload collection of the current request.
///
/// Inserted into the request extensions by [`terminate_middleware`];
/// handlers extract it with `Extension<RequestFiles>`.
#[derive(Debug, Clone, Default)]
pub struct RequestFiles(Arc<Mutex<FileBag>>);

impl RequestFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an upload under its form field name.
    pub fn insert(&self, field_name: &str, entry: impl Into<UploadEntry>) {
        self.lock().insert(field_name, entry);
    }

    /// Copy of the uploads recorded so far.
    pub fn snapshot(&self) -> FileBag {
        self.lock().clone()
    }

    /// Moves the recorded uploads out, leaving the collection empty.
    pub fn take(&self) -> FileBag {
        mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, FileBag> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// == Terminate Guard ==
/// Dispatches the terminate event for one request when dropped.
struct TerminateGuard {
    dispatcher: Arc<EventDispatcher>,
    method: Method,
    uri: Uri,
    status: Option<StatusCode>,
    files: RequestFiles,
}

impl Drop for TerminateGuard {
    fn drop(&mut self) {
        let event = TerminateEvent::new(
            mem::take(&mut self.method),
            mem::take(&mut self.uri),
            self.status,
            self.files.take(),
        );
        debug!(
            "Request terminated: {} {} ({:?})",
            event.method, event.uri, event.status
        );
        self.dispatcher.dispatch_terminate(&event);
    }
}

// == Terminate Body ==
/// Response body that holds the guard until the body itself is dropped.
struct TerminateBody {
    inner: BodyDataStream,
    _guard: TerminateGuard,
}

impl Stream for TerminateBody {
    type Item = Result<Bytes, axum::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Middleware that runs terminate listeners after the response has been sent.
///
/// The guard is created before the inner service runs, so the event also
/// fires when the request future is dropped before producing a response.
/// Listeners run inline on whichever runtime thread drops the body, so they
/// must stay short and must not block on async work.
pub async fn terminate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let files = RequestFiles::new();
    request.extensions_mut().insert(files.clone());

    let mut guard = TerminateGuard {
        dispatcher: state.dispatcher.clone(),
        method: request.method().clone(),
        uri: request.uri().clone(),
        status: None,
        files,
    };

    let response = next.run(request).await;
    guard.status = Some(response.status());

    let (parts, body) = response.into_parts();
    let body = TerminateBody {
        inner: body.into_data_stream(),
        _guard: guard,
    };
    Response::from_parts(parts, Body::from_stream(body))
}
