//! Error taxonomy for retrievals.

use std::io;
use std::path::PathBuf;

use crate::store::StoreError;

/// Failure of a `download` or `digest` call.
///
/// Callers that only speak I/O errors can convert with `io::Error::from`;
/// the kind is chosen per variant and the message is preserved.
#[derive(Debug, thiserror::Error)]
pub enum RetrieveError {
    /// URL could not be parsed, or its host is not the expected storage host.
    #[error("invalid source {url}: {reason}")]
    InvalidSource { url: String, reason: String },

    /// URL path could not be split into a bucket and a key.
    #[error("malformed object location {url}: {reason}")]
    MalformedLocation { url: String, reason: String },

    /// The store call, or reading the object body, failed.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] StoreError),

    /// Creating directories, creating the file, or writing it failed.
    #[error("local write to {} failed: {source}", path.display())]
    LocalWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cancellation token was set before the call finished.
    #[error("retrieval cancelled")]
    Cancelled,

    /// Written bytes do not hash to the MD5 carried by the ETag.
    #[error("digest mismatch: store reported {expected}, local file is {actual}")]
    DigestMismatch { expected: String, actual: String },
}

impl RetrieveError {
    pub(crate) fn local_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RetrieveError::LocalWrite {
            path: path.into(),
            source,
        }
    }

    /// `io::ErrorKind` this error maps to when flattened into `io::Error`.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            RetrieveError::InvalidSource { .. } | RetrieveError::MalformedLocation { .. } => {
                io::ErrorKind::InvalidInput
            }
            RetrieveError::Retrieval(StoreError::NotFound { .. }) => io::ErrorKind::NotFound,
            RetrieveError::Retrieval(StoreError::AccessDenied { .. }) => {
                io::ErrorKind::PermissionDenied
            }
            RetrieveError::Retrieval(_) => io::ErrorKind::Other,
            RetrieveError::LocalWrite { source, .. } => source.kind(),
            RetrieveError::Cancelled => io::ErrorKind::Interrupted,
            RetrieveError::DigestMismatch { .. } => io::ErrorKind::InvalidData,
        }
    }
}

impl From<RetrieveError> for io::Error {
    fn from(err: RetrieveError) -> Self {
        io::Error::new(err.io_kind(), err)
    }
}
