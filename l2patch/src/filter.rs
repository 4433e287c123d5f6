//! Path filtering for partial synchronization.

use glob::{MatchOptions, Pattern};

use crate::error::{SyncError, SyncResult};

/// A glob-style predicate over manifest paths.
///
/// Matching is case-insensitive and separator-agnostic: both the pattern and
/// the candidate path are normalized to forward slashes first, so
/// `system\*` and `system/*` select the same files.
#[derive(Debug, Clone)]
pub struct PathFilter {
    pattern: Option<Pattern>,
}

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

impl PathFilter {
    /// A filter that selects every path.
    pub fn match_all() -> Self {
        PathFilter { pattern: None }
    }

    /// Compile a glob pattern into a filter.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Format`] if the pattern is not valid glob syntax.
    pub fn new(pattern: &str) -> SyncResult<Self> {
        let normalized = pattern.replace('\\', "/");
        let pattern = Pattern::new(&normalized).map_err(|e| SyncError::Format {
            reason: format!("invalid filter pattern {:?}: {}", normalized, e),
        })?;
        Ok(PathFilter {
            pattern: Some(pattern),
        })
    }

    /// Whether a manifest path is selected by this filter.
    pub fn matches(&self, path: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.matches_with(&path.replace('\\', "/"), OPTIONS),
            None => true,
        }
    }
}
