//! L2Patch - client-side patch synchronization for the Lineage 2
//! distribution service.
//!
//! This library fetches a remote manifest describing the expected state of a
//! file tree, compares it against the local tree, and downloads any missing
//! or changed files with bounded parallelism, verifying content by SHA-1
//! digest. Remote content is LZMA-compressed and may be served either as a
//! single packaged object or as numbered segments; both are exposed to the
//! synchronizer as one logical stream.

pub mod decode;
pub mod error;
pub mod filter;
pub mod manifest;
pub mod remote;
pub mod scanner;
pub mod sync;

pub use error::{SyncError, SyncResult};
pub use filter::PathFilter;
pub use manifest::{decode_manifest, FileRecord, Sha1Digest};
pub use remote::{HttpBody, HttpClient, PatchResolver, PatchSource, ReqwestClient};
pub use sync::{FileFailure, SyncOptions, SyncReport, Synchronizer};
