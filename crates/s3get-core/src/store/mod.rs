//! Storage collaborator seam.
//!
//! The retriever only needs "get object by (bucket, key)". `ObjectStore` is
//! that one operation; `S3ObjectStore` implements it over `aws-sdk-s3`, and
//! tests substitute in-memory fakes.

mod body;
mod s3;

pub use s3::S3ObjectStore;

use std::fmt;
use std::io::Read;

/// An object as returned by the store: its body and the ETag, if any.
pub struct RetrievedObject {
    pub etag: Option<String>,
    pub body: Box<dyn Read + Send>,
}

impl RetrievedObject {
    pub fn new(etag: Option<String>, body: impl Read + Send + 'static) -> Self {
        Self {
            etag,
            body: Box::new(body),
        }
    }
}

impl fmt::Debug for RetrievedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrievedObject")
            .field("etag", &self.etag)
            .finish_non_exhaustive()
    }
}

/// Blocking object store client.
///
/// Implementations must be safe to call from several threads at once; the
/// retriever shares one instance across all its calls.
pub trait ObjectStore: Send + Sync {
    fn get_object(&self, bucket: &str, key: &str) -> Result<RetrievedObject, StoreError>;
}

/// Failure reported by an `ObjectStore`, or while reading an object body.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object s3://{bucket}/{key} not found")]
    NotFound { bucket: String, key: String },

    #[error("access denied to s3://{bucket}/{key}")]
    AccessDenied { bucket: String, key: String },

    /// Any other error response from the service.
    #[error("service error {code}: {message}")]
    Service { code: String, message: String },

    /// Request never produced a service response (DNS, TLS, timeout, ...).
    #[error("transport: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Object body stream failed partway through.
    #[error("reading object body: {0}")]
    Body(#[source] std::io::Error),
}
