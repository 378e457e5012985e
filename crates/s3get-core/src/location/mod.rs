//! Object location parsing.
//!
//! Turns `scheme://<host>/<bucket>/<key...>` into a bucket/key pair after
//! checking the host against the configured storage endpoint. Nothing here
//! touches the network.

mod decode;

use serde::{Deserialize, Serialize};

use crate::error::RetrieveError;

/// How bucket and key segments are taken from the URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentDecoding {
    /// Use the segments exactly as they appear in the URL.
    #[default]
    Raw,
    /// Percent-decode each segment as UTF-8.
    Decoded,
}

/// Bucket and key of a single object, plus the host it was addressed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub host: String,
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    /// Parses `url` and validates its host against `expected_host`
    /// (ASCII case-insensitive).
    ///
    /// The path is split on its first `/` (after the leading one): everything
    /// before is the bucket, everything after is the key, slashes included.
    pub fn parse(
        url: &str,
        expected_host: &str,
        decoding: SegmentDecoding,
    ) -> Result<Self, RetrieveError> {
        let parsed = url::Url::parse(url).map_err(|e| RetrieveError::InvalidSource {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let host = parsed.host_str().unwrap_or_default();
        if !host.eq_ignore_ascii_case(expected_host) {
            return Err(RetrieveError::InvalidSource {
                url: url.to_string(),
                reason: format!("not an S3 url for host {}", expected_host),
            });
        }

        let path = parsed.path();
        let path = path.strip_prefix('/').unwrap_or(path);
        let (bucket, key) = path
            .split_once('/')
            .ok_or_else(|| malformed(url, "missing object key"))?;
        if bucket.is_empty() {
            return Err(malformed(url, "empty bucket"));
        }
        if key.is_empty() {
            return Err(malformed(url, "empty object key"));
        }

        let (bucket, key) = match decoding {
            SegmentDecoding::Raw => (bucket.to_string(), key.to_string()),
            SegmentDecoding::Decoded => (
                decode::percent_decode(bucket)
                    .map_err(|_| malformed(url, "bucket is not valid UTF-8"))?,
                decode::percent_decode(key)
                    .map_err(|_| malformed(url, "object key is not valid UTF-8"))?,
            ),
        };

        Ok(ObjectLocation {
            host: host.to_string(),
            bucket,
            key,
        })
    }
}

fn malformed(url: &str, reason: &str) -> RetrieveError {
    RetrieveError::MalformedLocation {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
