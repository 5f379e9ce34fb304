//! Upload Descriptor Module
//!
//! Raw upload record in the `$_FILES` layout produced by a multipart parser.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Error code reported for an upload that was received without problems.
const UPLOAD_ERR_OK: i64 = 0;

// == Upload Descriptor ==
/// A raw upload record as handed over by the multipart parser.
///
/// Every field is optional: parsers leave `tmp_name` empty when the upload
/// failed, and hand-built collections frequently omit the metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDescriptor {
    /// Temporary on-disk location of the uploaded bytes
    #[serde(default)]
    pub tmp_name: Option<PathBuf>,
    /// Original file name sent by the client
    #[serde(default)]
    pub name: Option<String>,
    /// MIME type sent by the client
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    /// Upload error code, `UPLOAD_ERR_OK` on success
    #[serde(default)]
    pub error: Option<i64>,
}

impl UploadDescriptor {
    /// Creates a descriptor pointing at a temporary file.
    pub fn new(tmp_name: impl Into<PathBuf>) -> Self {
        Self {
            tmp_name: Some(tmp_name.into()),
            error: Some(UPLOAD_ERR_OK),
            ..Default::default()
        }
    }

    /// Returns the temporary path, if the descriptor carries a non-empty one.
    pub fn temp_path(&self) -> Option<&Path> {
        self.tmp_name
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Whether the parser reported a successful upload.
    pub fn is_ok(&self) -> bool {
        self.error.unwrap_or(UPLOAD_ERR_OK) == UPLOAD_ERR_OK
    }
}
