//! Error types for patch synchronization.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during patch synchronization.
///
/// The taxonomy mirrors how failures propagate: `Format` aborts manifest
/// decoding outright, `Network` is fatal at probe/manifest time but collected
/// per file during downloads, and `Io`, `Decode` and `DigestMismatch` are
/// always per-file failures.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Malformed manifest line or invalid hex digest.
    #[error("malformed manifest data: {reason}")]
    Format { reason: String },

    /// Non-success HTTP status or connection-level failure.
    #[error("request to {url} failed: {reason}")]
    Network {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// Local filesystem failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Corrupted compressed stream.
    #[error("corrupt compressed stream: {reason}")]
    Decode { reason: String },

    /// Written file does not match the manifest entry.
    #[error("digest mismatch for {path}: expected {expected}, got {actual}")]
    DigestMismatch {
        path: String,
        expected: String,
        actual: String,
    },
}

impl SyncError {
    /// Build a `Network` error for a non-success HTTP status.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        SyncError::Network {
            url: url.into(),
            status: Some(status),
            reason: format!("server returned HTTP {}", status),
        }
    }

    /// Build a `Network` error for a connection-level failure.
    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        SyncError::Network {
            url: url.into(),
            status: None,
            reason: reason.into(),
        }
    }

    /// Classify an I/O error surfaced while reading a decompressed stream.
    ///
    /// Segment readers report remote failures as `io::Error`s wrapping a
    /// [`SyncError::Network`]; those are unwrapped back into `Network`.
    /// Everything else coming out of the decoder is corrupt stream data.
    pub fn from_stream_error(err: io::Error) -> Self {
        match err.get_ref().and_then(|e| e.downcast_ref::<SyncError>()) {
            Some(SyncError::Network {
                url,
                status,
                reason,
            }) => SyncError::Network {
                url: url.clone(),
                status: *status,
                reason: reason.clone(),
            },
            _ => SyncError::Decode {
                reason: err.to_string(),
            },
        }
    }

    /// Wrap this error into an `io::Error` so it can cross a `Read` boundary.
    pub fn into_io(self) -> io::Error {
        io::Error::new(io::ErrorKind::Other, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display() {
        let err = SyncError::http_status("http://host/file.zip", 404);
        assert!(err.to_string().contains("http://host/file.zip"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_stream_error_recovers_network() {
        let inner = SyncError::http_status("http://host/file.z02", 404);
        let io_err = inner.into_io();

        let classified = SyncError::from_stream_error(io_err);
        assert!(matches!(
            classified,
            SyncError::Network {
                status: Some(404),
                ..
            }
        ));
    }

    #[test]
    fn test_stream_error_defaults_to_decode() {
        let io_err = io::Error::new(io::ErrorKind::InvalidData, "lzma header corrupt");
        let classified = SyncError::from_stream_error(io_err);
        assert!(matches!(classified, SyncError::Decode { .. }));
    }
}
