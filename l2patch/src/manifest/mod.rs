//! Remote manifest parsing.
//!
//! The manifest is the authoritative list of expected files for a version:
//! UTF-16 text, one `path:size:digest:0` record per line. This module
//! provides:
//! - Hex SHA-1 digest parsing (`digest`)
//! - Record line parse/encode (`record`)
//! - Whole-manifest decoding (`decode`)

mod decode;
mod digest;
mod record;

pub use decode::decode_manifest;
pub use digest::Sha1Digest;
pub use record::FileRecord;
