//! Streaming LZMA decompression.
//!
//! Every object the patch service serves (the manifest included) is an
//! LZMA-alone container. The decoder stops yielding bytes at logical
//! end-of-stream; callers copying from it should still bound the copy by the
//! expected size, since a read past the logical end pulls on the raw source
//! once more.

use std::io::Read;

use xz2::read::XzDecoder;
use xz2::stream::Stream;

use crate::error::{SyncError, SyncResult};

/// Memory limit handed to liblzma; effectively unlimited.
const MEMLIMIT: u64 = u64::MAX;

/// Wrap a raw byte stream with an LZMA-alone decompression filter.
///
/// Reads from the returned reader yield the canonical uncompressed bytes.
/// Corrupt compressed data surfaces as an I/O error from `read`.
pub fn lzma_reader<R: Read>(reader: R) -> SyncResult<XzDecoder<R>> {
    let stream = Stream::new_lzma_decoder(MEMLIMIT).map_err(|e| SyncError::Decode {
        reason: e.to_string(),
    })?;
    Ok(XzDecoder::new_stream(reader, stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use xz2::read::XzEncoder;
    use xz2::stream::LzmaOptions;

    /// Compress bytes into an LZMA-alone container.
    fn lzma_compress(data: &[u8]) -> Vec<u8> {
        let options = LzmaOptions::new_preset(6).unwrap();
        let stream = Stream::new_lzma_encoder(&options).unwrap();
        let mut encoder = XzEncoder::new_stream(Cursor::new(data), stream);
        let mut out = Vec::new();
        encoder.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_round_trip() {
        let data = b"patch file content, long enough to be worth compressing".repeat(64);
        let compressed = lzma_compress(&data);

        let mut reader = lzma_reader(&compressed[..]).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_round_trip_empty() {
        let compressed = lzma_compress(b"");
        let mut reader = lzma_reader(&compressed[..]).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_garbage_input_fails() {
        let garbage = vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x11, 0x22, 0x33];
        let mut reader = lzma_reader(&garbage[..]).unwrap();
        let mut out = Vec::new();
        assert!(reader.read_to_end(&mut out).is_err());
    }

    #[test]
    fn test_stops_at_logical_end() {
        // Trailing bytes after the container must not be consumed as content.
        let data = b"exact content".to_vec();
        let mut compressed = lzma_compress(&data);
        compressed.extend_from_slice(&[0xff; 16]);

        let mut reader = lzma_reader(&compressed[..]).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }
}
