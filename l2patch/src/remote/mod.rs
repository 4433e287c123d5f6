//! Remote patch service access.
//!
//! This module provides the pieces between the synchronizer and the patch
//! host:
//! - URL conventions for a `{host, game, version}` patch tree (`source`)
//! - An injectable HTTP client abstraction (`http`)
//! - Stream resolution with segmented fallback (`resolver`)

mod http;
mod resolver;
mod source;

pub use http::{HttpBody, HttpClient, ReqwestClient};
pub use resolver::PatchResolver;
pub use source::PatchSource;

#[cfg(test)]
pub use http::tests::MockHttpClient;
