//! Local file-tree state scanning.
//!
//! Decides, per manifest record, whether the local file already matches the
//! expected size and SHA-1 digest or needs to be downloaded again.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};
use tracing::debug;

use crate::error::{SyncError, SyncResult};
use crate::manifest::{FileRecord, Sha1Digest};

/// Buffer size for reading files during digest calculation (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Resolve a manifest path against the local tree root.
///
/// Manifest paths use backslash separators; both separator styles are
/// accepted and mapped to the platform's.
pub fn to_local_path(root: &Path, manifest_path: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for part in manifest_path.split(['\\', '/']).filter(|p| !p.is_empty()) {
        path.push(part);
    }
    path
}

/// Calculate the SHA-1 digest of a file by streaming its contents.
///
/// # Errors
///
/// Returns [`SyncError::Io`] if the file cannot be read.
pub fn file_digest(path: &Path) -> SyncResult<Sha1Digest> {
    let mut file = File::open(path).map_err(|e| SyncError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| SyncError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Sha1Digest::from_bytes(hasher.finalize().into()))
}

/// Check whether a local file needs to be updated.
///
/// Up to date means: the file exists, its length equals the record size, and
/// its streamed SHA-1 digest equals the record digest. Any I/O error during
/// the check is fail-open: the file is reported as needing update so the
/// download path gets a chance to replace it.
pub fn needs_update(root: &Path, record: &FileRecord) -> bool {
    let local = to_local_path(root, &record.path);
    match is_current(&local, record) {
        Ok(current) => !current,
        Err(e) => {
            debug!("{}: check failed, forcing update: {}", record.path, e);
            true
        }
    }
}

fn is_current(local: &Path, record: &FileRecord) -> SyncResult<bool> {
    let metadata = match local.metadata() {
        Ok(m) => m,
        Err(_) => return Ok(false),
    };

    if !metadata.is_file() || metadata.len() != record.size {
        return Ok(false);
    }

    Ok(file_digest(local)? == record.digest)
}
