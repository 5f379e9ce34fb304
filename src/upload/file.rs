//! Uploaded File Module
//!
//! File handle for an upload that has been spooled to a temporary file.

use std::path::{Path, PathBuf};

// == Uploaded File ==
/// Handle on a spooled upload.
///
/// The temporary file is owned by the host until the terminate hook removes
/// it; handlers that want to keep the bytes must move the file elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    path: PathBuf,
    client_name: String,
    mime_type: Option<String>,
    size: u64,
}

impl UploadedFile {
    /// Creates a handle for a spooled upload.
    pub fn new(
        path: impl Into<PathBuf>,
        client_name: impl Into<String>,
        mime_type: Option<String>,
        size: u64,
    ) -> Self {
        Self {
            path: path.into(),
            client_name: client_name.into(),
            mime_type,
            size,
        }
    }

    /// Temporary path of the spooled bytes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as sent by the client.
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}
