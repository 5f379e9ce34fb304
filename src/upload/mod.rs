//! Upload Module
//!
//! Typed model of a request's upload collection: raw descriptors produced by a
//! multipart parser, file handles, and nested groups keyed by form field name.

mod bag;
mod descriptor;
mod file;

pub use bag::{field_path, FileBag, UploadEntry};
pub use descriptor::UploadDescriptor;
pub use file::UploadedFile;
