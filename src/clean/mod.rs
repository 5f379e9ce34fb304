//! Clean Module
//!
//! Removes the temporary files referenced by an upload collection. Has no
//! dependency on the HTTP layer so it can run from any host.

mod cleaner;
mod report;

#[cfg(test)]
mod property_tests;

pub use cleaner::{clean_files, remove_temp_file, Removal};
pub use report::CleanReport;
