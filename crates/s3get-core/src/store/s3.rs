//! `ObjectStore` backed by `aws-sdk-s3`.

use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client;
use tokio::runtime::Handle;

use super::body::ByteStreamReader;
use super::{ObjectStore, RetrievedObject, StoreError};
use crate::config::StoreConfig;

/// Blocking facade over an async S3 client.
///
/// Every call blocks on `handle`, so methods must be called from plain
/// threads, never from inside a task running on that runtime.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    handle: Handle,
}

impl S3ObjectStore {
    pub fn new(client: Client, handle: Handle) -> Self {
        Self { client, handle }
    }

    /// Build a client from `cfg` plus the default credential chain.
    pub fn connect(cfg: &StoreConfig, handle: Handle) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()));
        if let Some(endpoint) = &cfg.endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let shared = handle.block_on(loader.load());
        let s3_conf = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(cfg.force_path_style)
            .build();
        tracing::debug!(
            region = %cfg.region,
            endpoint = ?cfg.endpoint_url,
            "s3 client configured"
        );
        Self::new(Client::from_conf(s3_conf), handle)
    }
}

impl ObjectStore for S3ObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<RetrievedObject, StoreError> {
        let output = self
            .handle
            .block_on(self.client.get_object().bucket(bucket).key(key).send())
            .map_err(|e| match e {
                SdkError::ServiceError(ctx) => classify(bucket, key, ctx.into_err()),
                other => StoreError::Transport(Box::new(other)),
            })?;

        let etag = output.e_tag().map(str::to_string);
        let body = ByteStreamReader::new(output.body, self.handle.clone());
        Ok(RetrievedObject::new(etag, body))
    }
}

fn classify(bucket: &str, key: &str, err: GetObjectError) -> StoreError {
    if err.is_no_such_key() {
        return StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };
    }
    match err.code() {
        Some("NoSuchBucket") | Some("NotFound") => StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        Some("AccessDenied") | Some("Forbidden") => StoreError::AccessDenied {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        code => StoreError::Service {
            code: code.unwrap_or("Unknown").to_string(),
            message: err.message().unwrap_or_default().to_string(),
        },
    }
}
