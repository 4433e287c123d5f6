//! The top-level synchronization flow.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use tracing::{debug, info};

use crate::decode::lzma_reader;
use crate::error::{SyncError, SyncResult};
use crate::filter::PathFilter;
use crate::manifest::FileRecord;
use crate::remote::PatchResolver;
use crate::scanner::{self, to_local_path};

use super::report::{FileFailure, SyncReport};

/// Default worker pool width.
const DEFAULT_WORKERS: usize = 16;

/// Upper bound on the per-job copy buffer (16 MiB), so huge files do not
/// pull their whole decompressed size into memory.
const DEFAULT_BUFFER_CAP: usize = 1 << 24;

/// Tuning knobs for a synchronization run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Number of worker threads updating files in parallel (minimum 1).
    pub workers: usize,
    /// Per-job copy buffer cap in bytes.
    pub buffer_cap: usize,
    /// Re-check size and digest of every written file.
    pub verify_after_write: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            workers: DEFAULT_WORKERS,
            buffer_cap: DEFAULT_BUFFER_CAP,
            verify_after_write: true,
        }
    }
}

/// Drives end-to-end synchronization of a local tree against a manifest.
///
/// Jobs for files needing update run on a fixed-width worker pool; each job
/// resolves the remote stream, decompresses, writes, and optionally
/// verifies. One job's failure never cancels its siblings; failures are
/// collected and reported after the join barrier.
pub struct Synchronizer {
    resolver: PatchResolver,
    root: PathBuf,
    options: SyncOptions,
}

impl Synchronizer {
    /// Create a synchronizer with default options.
    pub fn new(resolver: PatchResolver, root: impl Into<PathBuf>) -> Self {
        Self::with_options(resolver, root, SyncOptions::default())
    }

    /// Create a synchronizer with explicit options.
    pub fn with_options(
        resolver: PatchResolver,
        root: impl Into<PathBuf>,
        options: SyncOptions,
    ) -> Self {
        Synchronizer {
            resolver,
            root: root.into(),
            options,
        }
    }

    /// Synchronize the records selected by `filter`.
    ///
    /// Scans local state first, then updates every stale file with bounded
    /// parallelism. Returns the aggregated report; per-file failures are in
    /// the report, never an `Err`.
    pub fn run(&self, records: &[FileRecord], filter: &PathFilter) -> SyncReport {
        let selected: Vec<&FileRecord> = records
            .iter()
            .filter(|record| filter.matches(&record.path))
            .collect();

        let mut pending = Vec::new();
        let mut up_to_date = 0usize;
        for record in &selected {
            if scanner::needs_update(&self.root, record) {
                info!("{}: need update", record.path);
                pending.push(*record);
            } else {
                info!("{}: OK", record.path);
                up_to_date += 1;
            }
        }

        let failures = self.update_all(&pending);
        let updated = pending.len() - failures.len();

        SyncReport {
            selected: selected.len(),
            up_to_date,
            updated,
            failures,
        }
    }

    /// Run one update job per record on the worker pool and collect failures.
    fn update_all(&self, pending: &[&FileRecord]) -> Vec<FileFailure> {
        let failures = Mutex::new(Vec::new());
        if pending.is_empty() {
            return failures.into_inner().unwrap();
        }

        let cursor = AtomicUsize::new(0);
        let workers = self.options.workers.max(1).min(pending.len());

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| loop {
                    let i = cursor.fetch_add(1, Ordering::SeqCst);
                    let Some(record) = pending.get(i) else {
                        break;
                    };

                    match self.update_file(record) {
                        Ok(()) => info!("{}: OK", record.path),
                        Err(error) => failures.lock().unwrap().push(FileFailure {
                            path: record.path.clone(),
                            error,
                        }),
                    }
                });
            }
        });

        failures.into_inner().unwrap()
    }

    /// Update a single file: resolve, decompress, write, verify.
    fn update_file(&self, record: &FileRecord) -> SyncResult<()> {
        let dest = to_local_path(&self.root, &record.path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| SyncError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        debug!("{}: resolving", record.path);
        let raw = self.resolver.open_file(&record.path)?;

        debug!("{}: decoding", record.path);
        let mut reader = lzma_reader(raw)?;
        self.write_stream(&mut reader, &dest, record.size)?;

        if self.options.verify_after_write {
            self.verify_written(&dest, record)?;
        }
        Ok(())
    }

    /// Stream-copy decompressed content to the destination file.
    fn write_stream(
        &self,
        reader: &mut impl Read,
        dest: &Path,
        expected_size: u64,
    ) -> SyncResult<()> {
        let io_err = |e| SyncError::Io {
            path: dest.to_path_buf(),
            source: e,
        };

        let file = File::create(dest).map_err(io_err)?;
        let mut writer = BufWriter::new(file);

        // Buffer capped at buffer_cap so huge files stay off the heap whole.
        let buffer_len = expected_size.min(self.options.buffer_cap as u64).max(1) as usize;
        let mut buffer = vec![0u8; buffer_len];
        let mut written: u64 = 0;

        // Stop at the record size rather than draining to end-of-stream:
        // one read past the decoder's logical end pulls on the raw source
        // again, which on a segmented download requests a segment that does
        // not exist.
        while written < expected_size {
            let want = buffer.len().min((expected_size - written) as usize);
            let n = reader
                .read(&mut buffer[..want])
                .map_err(SyncError::from_stream_error)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buffer[..n]).map_err(io_err)?;
            written += n as u64;
        }

        writer.flush().map_err(io_err)
    }

    /// Post-write verification: re-check size and digest against the record.
    fn verify_written(&self, dest: &Path, record: &FileRecord) -> SyncResult<()> {
        let metadata = dest.metadata().map_err(|e| SyncError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;
        if metadata.len() != record.size {
            return Err(SyncError::DigestMismatch {
                path: record.path.clone(),
                expected: format!("{} bytes", record.size),
                actual: format!("{} bytes", metadata.len()),
            });
        }

        let actual = scanner::file_digest(dest)?;
        if actual != record.digest {
            return Err(SyncError::DigestMismatch {
                path: record.path.clone(),
                expected: record.digest.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }
}
