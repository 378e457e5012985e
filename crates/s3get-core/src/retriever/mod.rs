//! Fetch objects by URL into local files and report their ETag.
//!
//! `RemoteObjectRetriever` is stateless apart from the shared store handle
//! and its config, so one instance can serve any number of threads. Each
//! call is a single `get_object`; nothing is retried.

mod copy;

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use crate::checksum;
use crate::config::RetrieverConfig;
use crate::control::CancelToken;
use crate::error::RetrieveError;
use crate::location::{ObjectLocation, SegmentDecoding};
use crate::store::{ObjectStore, RetrievedObject};

/// Adapter between artifact URLs and an `ObjectStore`.
pub struct RemoteObjectRetriever {
    store: Arc<dyn ObjectStore>,
    config: RetrieverConfig,
}

impl RemoteObjectRetriever {
    pub fn new(store: Arc<dyn ObjectStore>, config: RetrieverConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Download the object at `url` into `destination`, returning its ETag.
    ///
    /// Bucket and key are percent-decoded. Missing parent directories are
    /// created and an existing file is truncated. On failure a partially
    /// written file may remain. `Ok(None)` means the store reported no ETag.
    pub fn download(&self, url: &str, destination: &Path) -> Result<Option<String>, RetrieveError> {
        self.download_with(url, destination, &CancelToken::new())
    }

    /// `download` that stops with `Cancelled` once `cancel` is set. The token
    /// is checked before the store call and before each copied chunk.
    pub fn download_with(
        &self,
        url: &str,
        destination: &Path,
        cancel: &CancelToken,
    ) -> Result<Option<String>, RetrieveError> {
        let location =
            ObjectLocation::parse(url, &self.config.expected_host, SegmentDecoding::Decoded)?;
        if cancel.is_cancelled() {
            return Err(RetrieveError::Cancelled);
        }

        tracing::debug!(
            bucket = %location.bucket,
            key = %location.key,
            dest = %destination.display(),
            "downloading object"
        );
        let RetrievedObject { etag, body } =
            self.store.get_object(&location.bucket, &location.key)?;

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RetrieveError::local_write(parent, e))?;
        }
        let file =
            File::create(destination).map_err(|e| RetrieveError::local_write(destination, e))?;

        let expected_md5 = if self.config.verify_md5_etag {
            let md5 = etag.as_deref().and_then(checksum::md5_from_etag);
            if md5.is_none() {
                tracing::debug!(etag = ?etag, "etag is not a plain MD5, skipping verification");
            }
            md5
        } else {
            None
        };
        let mut ctx = expected_md5.as_ref().map(|_| md5::Context::new());

        let copied = copy::copy_chunks(
            body,
            file,
            destination,
            self.config.copy_buffer_len(),
            cancel,
            ctx.as_mut(),
        )?;

        if let (Some(expected), Some(ctx)) = (expected_md5, ctx) {
            let actual = hex::encode(ctx.compute().0);
            if actual != expected {
                tracing::warn!(%expected, %actual, dest = %destination.display(), "md5 mismatch");
                return Err(RetrieveError::DigestMismatch { expected, actual });
            }
        }

        tracing::info!(
            bucket = %location.bucket,
            key = %location.key,
            bytes = copied,
            etag = ?etag,
            "download complete"
        );
        Ok(etag)
    }

    /// Return the ETag of the object at `url` without writing anything locally.
    ///
    /// Segments are decoded according to `RetrieverConfig::digest_decoding`
    /// (raw by default, unlike `download`). The body is fetched and dropped.
    pub fn digest(&self, url: &str) -> Result<Option<String>, RetrieveError> {
        self.digest_with(url, &CancelToken::new())
    }

    /// `digest` that returns `Cancelled` instead of calling the store once
    /// `cancel` is set.
    pub fn digest_with(
        &self,
        url: &str,
        cancel: &CancelToken,
    ) -> Result<Option<String>, RetrieveError> {
        let location =
            ObjectLocation::parse(url, &self.config.expected_host, self.config.digest_decoding)?;
        if cancel.is_cancelled() {
            return Err(RetrieveError::Cancelled);
        }

        let object = self.store.get_object(&location.bucket, &location.key)?;
        tracing::debug!(
            bucket = %location.bucket,
            key = %location.key,
            etag = ?object.etag,
            "digest"
        );
        Ok(object.etag)
    }

    /// Accepted for callers that expect an interrupt hook. Does not stop
    /// anything: in-flight calls run to completion. Use a `CancelToken` with
    /// `download_with` / `digest_with` to cancel.
    pub fn interrupt(&self) {
        tracing::debug!("interrupt requested; in-flight retrievals are not cancelled");
    }
}
