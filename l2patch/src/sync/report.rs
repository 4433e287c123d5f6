//! Synchronization outcome reporting.

use crate::error::SyncError;

/// A per-file failure recorded during synchronization.
#[derive(Debug)]
pub struct FileFailure {
    /// Manifest path of the file that failed.
    pub path: String,
    /// What went wrong.
    pub error: SyncError,
}

/// Aggregated result of one synchronization run.
///
/// Per-file failures live here rather than in a process-level error: the run
/// as a whole succeeds even when individual files fail.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Records selected by the path filter.
    pub selected: usize,
    /// Files that already matched size and digest.
    pub up_to_date: usize,
    /// Files downloaded and written successfully.
    pub updated: usize,
    /// Files whose update failed, in no particular order.
    pub failures: Vec<FileFailure>,
}

impl SyncReport {
    /// Whether every selected file ended up matching the manifest.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
