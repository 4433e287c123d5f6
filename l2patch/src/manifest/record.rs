//! Manifest file records.

use crate::error::{SyncError, SyncResult};

use super::digest::Sha1Digest;

/// One entry of the remote manifest: the expected state of a single file.
///
/// Records are parsed once from the manifest at startup and referenced
/// read-only by every later stage; they are never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Relative path within the patch tree. The manifest uses backslash
    /// separators; lookups normalize as needed.
    pub path: String,
    /// Expected decompressed length in bytes.
    pub size: u64,
    /// SHA-1 digest of the decompressed content.
    pub digest: Sha1Digest,
}

impl FileRecord {
    /// Parse a manifest line of the form `path:size:digest:0`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Format`] for a line with fewer than four fields,
    /// a non-integer size, or an invalid digest.
    pub fn parse_line(line: &str) -> SyncResult<Self> {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 4 {
            return Err(SyncError::Format {
                reason: format!("expected 4 fields, got {}: {:?}", fields.len(), line),
            });
        }

        let size: u64 = fields[1].parse().map_err(|_| SyncError::Format {
            reason: format!("invalid size {:?} for {:?}", fields[1], fields[0]),
        })?;
        let digest = Sha1Digest::parse(fields[2])?;

        Ok(FileRecord {
            path: fields[0].to_string(),
            size,
            digest,
        })
    }

    /// Encode this record back to its manifest line form.
    ///
    /// The trailing field is the reserved flag, always zero.
    pub fn to_line(&self) -> String {
        format!("{}:{}:{}:0", self.path, self.size, self.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_line() {
        let record =
            FileRecord::parse_line("System/client.ini:1024:3f786850e387550fdab836ed7e6dc881de23001b:0")
                .unwrap();
        assert_eq!(record.path, "System/client.ini");
        assert_eq!(record.size, 1024);
        assert_eq!(
            record.digest,
            "3F786850E387550FDAB836ED7E6DC881DE23001B".parse().unwrap()
        );
    }

    #[test]
    fn test_parse_line_backslash_path() {
        let record =
            FileRecord::parse_line(r"system\l2.exe:42:3f786850e387550fdab836ed7e6dc881de23001b:0")
                .unwrap();
        assert_eq!(record.path, r"system\l2.exe");
    }

    #[test]
    fn test_parse_line_too_few_fields() {
        let err = FileRecord::parse_line("System/client.ini:1024:abcd").unwrap_err();
        assert!(matches!(err, SyncError::Format { .. }));
    }

    #[test]
    fn test_parse_line_bad_size() {
        let err = FileRecord::parse_line(
            "System/client.ini:big:3f786850e387550fdab836ed7e6dc881de23001b:0",
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid size"));
    }

    #[test]
    fn test_parse_line_bad_digest() {
        assert!(FileRecord::parse_line("System/client.ini:1024:abc:0").is_err());
    }

    #[test]
    fn test_to_line() {
        let record = FileRecord {
            path: "System/client.ini".to_string(),
            size: 1024,
            digest: "3f786850e387550fdab836ed7e6dc881de23001b".parse().unwrap(),
        };
        assert_eq!(
            record.to_line(),
            "System/client.ini:1024:3f786850e387550fdab836ed7e6dc881de23001b:0"
        );
    }

    proptest! {
        #[test]
        fn test_line_round_trip(
            path in "[A-Za-z0-9_./-]{1,48}",
            size in 0u64..=u32::MAX as u64,
            bytes in prop::array::uniform20(any::<u8>()),
        ) {
            let record = FileRecord {
                path,
                size,
                digest: Sha1Digest::from_bytes(bytes),
            };
            let decoded = FileRecord::parse_line(&record.to_line()).unwrap();
            prop_assert_eq!(decoded, record);
        }
    }
}
