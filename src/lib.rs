//! Request File Clean - removes temporary uploads after each request
//!
//! Spooled upload files are deleted by a late terminate listener once the
//! response has been sent.

pub mod api;
pub mod clean;
pub mod config;
pub mod error;
pub mod kernel;
pub mod models;
pub mod upload;

pub use api::{create_router, AppState, RequestFiles};
pub use clean::{clean_files, CleanReport};
pub use config::Config;
pub use kernel::{EventDispatcher, RequestFileCleanBundle, RequestFileCleanListener};
pub use upload::{FileBag, UploadDescriptor, UploadEntry, UploadedFile};
