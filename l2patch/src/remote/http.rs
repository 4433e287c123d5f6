//! HTTP client abstraction for testability

use std::io::Read;
use std::time::Duration;

use crate::error::{SyncError, SyncResult};

/// An HTTP response: status code plus (for 200) a readable body stream.
pub struct HttpBody {
    status: u16,
    body: Box<dyn Read + Send>,
}

impl HttpBody {
    /// Create a response from a status code and body stream.
    pub fn new(status: u16, body: Box<dyn Read + Send>) -> Self {
        HttpBody { status, body }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the response carries the requested content.
    ///
    /// The patch service contract distinguishes only 200 from everything
    /// else; any other code means "not available".
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Consume the response, yielding its body stream.
    pub fn into_body(self) -> Box<dyn Read + Send> {
        self.body
    }
}

/// Trait for HTTP GET operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests. The body is a stream rather
/// than a buffer so large patch files are never held in memory whole.
pub trait HttpClient: Send + Sync {
    /// Perform an HTTP GET request, returning the status and body stream.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Network`] for connection-level failures only;
    /// non-success statuses are reported through the response.
    fn open(&self, url: &str) -> SyncResult<HttpBody>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestClient {
    /// Create a client with the baseline configuration: no request timeout,
    /// so a stalled read blocks its worker until the connection drops.
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Create a client with a per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl HttpClient for ReqwestClient {
    fn open(&self, url: &str) -> SyncResult<HttpBody> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| SyncError::transport(url, e.to_string()))?;

        let status = response.status().as_u16();
        Ok(HttpBody::new(status, Box::new(response)))
    }
}
