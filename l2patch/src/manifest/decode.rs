//! Manifest text decoding.
//!
//! The patch service ships its manifest as UTF-16 text, one record per line.
//! A byte-order mark selects the endianness; without one, big-endian is
//! assumed, matching the service's historical encoder.

use std::io::Read;

use crate::error::{SyncError, SyncResult};

use super::record::FileRecord;

/// Decode a manifest byte stream into its ordered file records.
///
/// Line order is preserved. Any malformed line aborts the whole decode;
/// there is no best-effort skipping.
///
/// # Errors
///
/// Returns [`SyncError::Format`] for invalid UTF-16 data or a malformed
/// record line, and a network/decode error if the underlying stream fails.
pub fn decode_manifest<R: Read>(mut reader: R) -> SyncResult<Vec<FileRecord>> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(SyncError::from_stream_error)?;

    let text = decode_utf16_text(&bytes)?;

    text.lines()
        .filter(|line| !line.is_empty())
        .map(FileRecord::parse_line)
        .collect()
}

fn decode_utf16_text(bytes: &[u8]) -> SyncResult<String> {
    let (bytes, big_endian) = match bytes {
        [0xfe, 0xff, rest @ ..] => (rest, true),
        [0xff, 0xfe, rest @ ..] => (rest, false),
        _ => (bytes, true),
    };

    if bytes.len() % 2 != 0 {
        return Err(SyncError::Format {
            reason: format!("UTF-16 data has odd byte length {}", bytes.len()),
        });
    }

    let units = bytes.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });

    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| SyncError::Format {
            reason: format!("invalid UTF-16 data: {}", e),
        })
}
