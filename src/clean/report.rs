//! Clean Report Module
//!
//! Tally of what a cleanup pass did.

use crate::clean::Removal;

// == Clean Report ==
/// Outcome counts of one cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Files deleted
    pub removed: usize,
    /// Paths that did not reference a regular file
    pub missing: usize,
    /// Deletions that failed and were abandoned
    pub failed: usize,
}

impl CleanReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one removal attempt.
    pub fn record(&mut self, removal: Removal) {
        match removal {
            Removal::Removed => self.removed += 1,
            Removal::Missing => self.missing += 1,
            Removal::Failed => self.failed += 1,
        }
    }

    /// Total number of paths visited.
    pub fn visited(&self) -> usize {
        self.removed + self.missing + self.failed
    }

    /// Whether no deletion had to be abandoned.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
