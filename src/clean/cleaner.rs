//! Upload Cleaner
//!
//! Walks an upload collection and deletes every temporary file it references.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use crate::clean::CleanReport;
use crate::upload::{FileBag, UploadEntry};

/// Outcome of a single removal attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The file existed and was deleted
    Removed,
    /// Nothing to delete at that path
    Missing,
    /// The delete failed and was abandoned
    Failed,
}

/// Deletes the temporary file of every upload reachable from `files`.
///
/// Groups are descended into at any depth, descriptors and file handles have
/// their temporary path removed when it references a regular file. Failures
/// are logged and counted, never returned.
///
/// # Example
/// ```
/// use request_file_clean::clean::clean_files;
/// use request_file_clean::upload::FileBag;
///
/// let report = clean_files(&FileBag::new());
/// assert_eq!(report.visited(), 0);
/// ```
pub fn clean_files(files: &FileBag) -> CleanReport {
    let mut report = CleanReport::new();
    // Explicit stack so arbitrarily deep groups cannot exhaust the call stack
    let mut pending: Vec<&UploadEntry> = files.values().collect();

    while let Some(entry) = pending.pop() {
        match entry {
            UploadEntry::Group(group) => pending.extend(group.values()),
            UploadEntry::Descriptor(descriptor) => {
                if let Some(path) = descriptor.temp_path() {
                    if !descriptor.is_ok() {
                        debug!(
                            "Upload {} reported error code {:?}, removing partial file",
                            path.display(),
                            descriptor.error
                        );
                    }
                    report.record(remove_temp_file(path));
                }
            }
            UploadEntry::File(file) => report.record(remove_temp_file(file.path())),
        }
    }

    report
}

/// Deletes `path` if it currently references a regular file.
pub fn remove_temp_file(path: &Path) -> Removal {
    if !path.is_file() {
        return Removal::Missing;
    }

    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed temporary upload {}", path.display());
            Removal::Removed
        }
        // Someone else got there first
        Err(e) if e.kind() == ErrorKind::NotFound => Removal::Missing,
        Err(e) => {
            warn!("Could not remove temporary upload {}: {}", path.display(), e);
            Removal::Failed
        }
    }
}
