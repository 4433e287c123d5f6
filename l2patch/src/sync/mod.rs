//! Synchronization orchestration.
//!
//! Coordinates the end-to-end update flow:
//!
//! ```text
//! manifest records ──► scanner (size + digest check)
//!         │                    │
//!         │              needs-update set
//!         │                    │
//!         └──► Synchronizer ── worker pool ──► resolve ► decode ► write ► verify
//!                                   │
//!                          shared failure list ──► SyncReport
//! ```
//!
//! Each file job walks Pending → Resolving → Decoding → Writing →
//! Done/Failed; Failed is terminal, with no retries.

mod orchestrator;
mod report;

pub use orchestrator::{SyncOptions, Synchronizer};
pub use report::{FileFailure, SyncReport};
