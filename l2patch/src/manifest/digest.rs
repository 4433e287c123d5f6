//! SHA-1 digest parsing and formatting.

use std::fmt;
use std::str::FromStr;

use crate::error::{SyncError, SyncResult};

/// A SHA-1 digest of a file's decompressed content.
///
/// Parsed from 40 hexadecimal characters, case-insensitive. Because the raw
/// bytes are stored, digest comparison is case-insensitive by construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha1Digest([u8; 20]);

impl Sha1Digest {
    /// Digest length in bytes.
    pub const LEN: usize = 20;

    /// Create a digest from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Sha1Digest(bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse a digest from hex, accepting upper and lower case.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Format`] if the input is not exactly 40
    /// characters or contains a character outside `[0-9A-Fa-f]`.
    pub fn parse(s: &str) -> SyncResult<Self> {
        if s.len() != 2 * Self::LEN {
            return Err(SyncError::Format {
                reason: format!("digest must be {} hex characters, got {}", 2 * Self::LEN, s.len()),
            });
        }

        let mut bytes = [0u8; Self::LEN];
        for (i, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
            let hi = hex_value(chunk[0])?;
            let lo = hex_value(chunk[1])?;
            bytes[i] = hi << 4 | lo;
        }
        Ok(Sha1Digest(bytes))
    }
}

fn hex_value(c: u8) -> SyncResult<u8> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        _ => Err(SyncError::Format {
            reason: format!("illegal character {:?} in hex digest", c as char),
        }),
    }
}

impl FromStr for Sha1Digest {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sha1Digest::parse(s)
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha1Digest({})", self)
    }
}
