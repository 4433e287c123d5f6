//! Remote content resolution.
//!
//! Produces a single logical byte stream per file, hiding whether the
//! service stores it as one packaged object or as numbered segments.

use std::io::{self, Read};
use std::sync::Arc;

use tracing::debug;

use crate::decode::lzma_reader;
use crate::error::{SyncError, SyncResult};
use crate::manifest::{decode_manifest, FileRecord};

use super::http::HttpClient;
use super::source::PatchSource;

/// Resolves patch content from the remote service.
///
/// Cheap to clone; worker threads share the underlying HTTP client.
#[derive(Clone)]
pub struct PatchResolver {
    source: PatchSource,
    client: Arc<dyn HttpClient>,
}

impl PatchResolver {
    /// Create a resolver for a patch source.
    pub fn new(source: PatchSource, client: Arc<dyn HttpClient>) -> Self {
        PatchResolver { source, client }
    }

    /// The patch source this resolver reads from.
    pub fn source(&self) -> &PatchSource {
        &self.source
    }

    /// Probe whether the requested version exists on the service.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Network`] only for connection-level failures;
    /// a non-200 answer is simply `Ok(false)`.
    pub fn is_available(&self) -> SyncResult<bool> {
        let response = self.client.open(&self.source.manifest_url())?;
        Ok(response.is_success())
    }

    /// Fetch and decode the manifest for this version.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Network`] if the manifest cannot be fetched and
    /// [`SyncError::Format`]/[`SyncError::Decode`] if its content is
    /// malformed. All of these are fatal to the run.
    pub fn fetch_manifest(&self) -> SyncResult<Vec<FileRecord>> {
        let url = self.source.manifest_url();
        let response = self.client.open(&url)?;
        if !response.is_success() {
            return Err(SyncError::http_status(url, response.status()));
        }

        decode_manifest(lzma_reader(response.into_body())?)
    }

    /// Open the compressed content stream for a manifest path.
    ///
    /// Tries the whole-package URL first; on any non-200 answer it falls
    /// back to the segmented form, chaining `.z01`, `.z02`, … lazily.
    /// Callers read until end-of-stream with no knowledge of which mode
    /// was chosen.
    pub fn open_file(&self, path: &str) -> SyncResult<Box<dyn Read + Send>> {
        let url = self.source.package_url(path);
        let response = self.client.open(&url)?;
        if response.is_success() {
            return Ok(response.into_body());
        }

        debug!(
            "{}: no whole package (HTTP {}), switching to segments",
            path,
            response.status()
        );
        Ok(Box::new(SegmentReader::open(
            self.source.clone(),
            Arc::clone(&self.client),
            path,
        )?))
    }
}

/// A reader chaining a file's numbered segments into one stream.
///
/// Segment 1 is fetched eagerly; segment *n+1* is requested only once
/// segment *n* is exhausted. There is no upper bound on the segment count:
/// the LZMA layer above reaches its logical end before a request for a
/// nonexistent segment would be made, and a non-200 segment answer fails
/// the read with the status code.
struct SegmentReader {
    source: PatchSource,
    client: Arc<dyn HttpClient>,
    path: String,
    index: u32,
    current: Box<dyn Read + Send>,
}

impl SegmentReader {
    fn open(source: PatchSource, client: Arc<dyn HttpClient>, path: &str) -> SyncResult<Self> {
        let mut reader = SegmentReader {
            source,
            client,
            path: path.to_string(),
            index: 0,
            current: Box::new(io::empty()),
        };
        reader.current = reader.next_segment().map_err(SyncError::from_stream_error)?;
        Ok(reader)
    }

    fn next_segment(&mut self) -> io::Result<Box<dyn Read + Send>> {
        self.index += 1;
        let url = self.source.segment_url(&self.path, self.index);

        let response = self
            .client
            .open(&url)
            .map_err(SyncError::into_io)?;
        if !response.is_success() {
            return Err(SyncError::http_status(url, response.status()).into_io());
        }

        debug!("{}: reading segment {:02}", self.path, self.index);
        Ok(response.into_body())
    }
}

impl Read for SegmentReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let n = self.current.read(buf)?;
            if n > 0 {
                return Ok(n);
            }
            self.current = self.next_segment()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::http::tests::MockHttpClient;

    fn source() -> PatchSource {
        PatchSource::new("patch.example.com", "lineage2", 48)
    }

    #[test]
    fn test_is_available() {
        let mut mock = MockHttpClient::new();
        mock.insert(source().manifest_url(), vec![0]);
        let resolver = PatchResolver::new(source(), Arc::new(mock));
        assert!(resolver.is_available().unwrap());

        let resolver = PatchResolver::new(source(), Arc::new(MockHttpClient::new()));
        assert!(!resolver.is_available().unwrap());
    }

    #[test]
    fn test_open_file_direct() {
        let mut mock = MockHttpClient::new();
        mock.insert(source().package_url("system/l2.exe"), b"whole".to_vec());
        let resolver = PatchResolver::new(source(), Arc::new(mock));

        let mut out = Vec::new();
        resolver
            .open_file("system/l2.exe")
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"whole");
    }

    #[test]
    fn test_open_file_segmented_chains_in_order() {
        let mut mock = MockHttpClient::new();
        mock.insert(source().segment_url("system/l2.exe", 1), b"first-".to_vec());
        mock.insert(source().segment_url("system/l2.exe", 2), b"second".to_vec());
        let mock = Arc::new(mock);
        let resolver = PatchResolver::new(source(), Arc::clone(&mock) as Arc<dyn HttpClient>);

        let mut reader = resolver.open_file("system/l2.exe").unwrap();
        let mut out = vec![0u8; 12];
        reader.read_exact(&mut out).unwrap();
        assert_eq!(out, b"first-second");

        // Probe first, then segments in increasing order; segment 2 only
        // after segment 1 was exhausted.
        let requested = mock.requested();
        assert_eq!(requested[0], source().package_url("system/l2.exe"));
        assert_eq!(requested[1], source().segment_url("system/l2.exe", 1));
        assert_eq!(requested[2], source().segment_url("system/l2.exe", 2));
    }

    #[test]
    fn test_segment_fetch_is_lazy() {
        let mut mock = MockHttpClient::new();
        mock.insert(source().segment_url("a.bin", 1), b"123456".to_vec());
        mock.insert(source().segment_url("a.bin", 2), b"789".to_vec());
        let mock = Arc::new(mock);
        let resolver = PatchResolver::new(source(), Arc::clone(&mock) as Arc<dyn HttpClient>);

        let mut reader = resolver.open_file("a.bin").unwrap();
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf).unwrap();

        // Only the probe and segment 1 so far.
        assert_eq!(mock.requested().len(), 2);
    }

    #[test]
    fn test_missing_segment_fails_with_status() {
        let mut mock = MockHttpClient::new();
        mock.insert(source().segment_url("a.bin", 1), b"only".to_vec());
        let resolver = PatchResolver::new(source(), Arc::new(mock));

        let mut reader = resolver.open_file("a.bin").unwrap();
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();

        let classified = SyncError::from_stream_error(err);
        assert!(matches!(
            classified,
            SyncError::Network {
                status: Some(404),
                ..
            }
        ));
    }

    #[test]
    fn test_file_absent_entirely_fails_on_open() {
        let resolver = PatchResolver::new(source(), Arc::new(MockHttpClient::new()));
        assert!(resolver.open_file("nope.bin").is_err());
    }
}
