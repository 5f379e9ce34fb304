//! Request File Clean Bundle
//!
//! Registers upload cleanup as a late terminate listener.

use std::sync::Arc;

use tracing::{debug, info};

use crate::clean::clean_files;
use crate::kernel::{EventDispatcher, TerminateEvent, TerminateListener};

/// A unit of functionality that plugs listeners into the dispatcher.
pub trait Bundle {
    /// Name the host configuration uses to address the bundle.
    fn alias(&self) -> &'static str;

    fn build(&self, dispatcher: &mut EventDispatcher);
}

// == Listener ==
/// Deletes a terminated request's leftover upload files.
///
/// Some hosts keep spooled uploads around after the request is done, so they
/// are removed explicitly once the response is out.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestFileCleanListener;

impl RequestFileCleanListener {
    /// Runs after other teardown listeners.
    pub const PRIORITY: i32 = -9999;
}

impl TerminateListener for RequestFileCleanListener {
    fn name(&self) -> &'static str {
        "request_file_clean.listener"
    }

    fn on_terminate(&self, event: &TerminateEvent) {
        if event.files.is_empty() {
            return;
        }

        let report = clean_files(&event.files);
        if report.removed > 0 || !report.is_clean() {
            info!(
                "{} {}: removed {} temporary uploads ({} missing, {} failed)",
                event.method, event.uri, report.removed, report.missing, report.failed
            );
        } else {
            debug!(
                "{} {}: no temporary uploads left to remove",
                event.method, event.uri
            );
        }
    }
}

// == Bundle ==
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestFileCleanBundle;

impl RequestFileCleanBundle {
    pub const ALIAS: &'static str = "request_file_clean";
}

impl Bundle for RequestFileCleanBundle {
    fn alias(&self) -> &'static str {
        Self::ALIAS
    }

    fn build(&self, dispatcher: &mut EventDispatcher) {
        dispatcher.add_listener(
            Arc::new(RequestFileCleanListener),
            RequestFileCleanListener::PRIORITY,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{FileBag, UploadDescriptor, UploadedFile};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[test]
    fn test_alias() {
        assert_eq!(RequestFileCleanBundle.alias(), "request_file_clean");
    }

    #[test]
    fn test_bundle_registers_late_listener() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register_bundle(&RequestFileCleanBundle);

        assert!(dispatcher.has_bundle("request_file_clean"));
        assert_eq!(
            dispatcher.listeners(),
            vec![("request_file_clean.listener", -9999)]
        );
    }

    #[test]
    fn test_listener_removes_uploaded_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test_file");
        fs::write(&path, b"data").unwrap();

        let mut files = FileBag::new();
        files.set("test_file", UploadedFile::new(&path, "test.txt", None, 4));
        RequestFileCleanListener.on_terminate(&TerminateEvent::for_files(files));

        assert!(!path.exists());
    }

    #[test]
    fn test_listener_ignores_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut files = FileBag::new();
        files.set("gone", UploadDescriptor::new(dir.path().join("non_existent")));

        RequestFileCleanListener.on_terminate(&TerminateEvent::for_files(files));
    }

    struct Witness {
        path: std::path::PathBuf,
        seen: Arc<Mutex<Vec<bool>>>,
    }

    impl TerminateListener for Witness {
        fn name(&self) -> &'static str {
            "witness"
        }

        fn on_terminate(&self, _event: &TerminateEvent) {
            self.seen.lock().unwrap().push(self.path.exists());
        }
    }

    #[test]
    fn test_default_priority_listeners_see_files_before_cleanup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("upload");
        fs::write(&path, b"data").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut dispatcher = EventDispatcher::new();
        dispatcher.register_bundle(&RequestFileCleanBundle);
        dispatcher.add_listener(
            Arc::new(Witness {
                path: path.clone(),
                seen: seen.clone(),
            }),
            0,
        );

        let mut files = FileBag::new();
        files.set("upload", UploadDescriptor::new(&path));
        dispatcher.dispatch_terminate(&TerminateEvent::for_files(files));

        assert_eq!(*seen.lock().unwrap(), vec![true]);
        assert!(!path.exists());
    }
}
