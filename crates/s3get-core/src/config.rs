use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::location::SegmentDecoding;

/// Regional endpoint that artifact URLs are expected to point at.
pub const DEFAULT_EXPECTED_HOST: &str = "s3-us-west-2.amazonaws.com";

/// Upper bound on the copy buffer; larger configured values are clamped.
pub const MAX_BUFFER_BYTES: usize = 16 * 1024 * 1024;

/// Region the S3 client signs requests for.
pub const DEFAULT_REGION: &str = "us-west-2";

/// S3 client settings (optional `[store]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub region: String,
    /// Custom endpoint (e.g. MinIO). None = AWS default for the region.
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Address buckets as `host/bucket` instead of `bucket.host`.
    #[serde(default)]
    pub force_path_style: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            force_path_style: false,
        }
    }
}

/// Settings for `RemoteObjectRetriever`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Host every object URL must carry; others are rejected before any I/O.
    pub expected_host: String,
    /// Copy buffer size in bytes; cancellation is checked once per buffer.
    /// Use `copy_buffer_len` to read it.
    pub buffer_bytes: usize,
    /// Segment handling for `digest`. `download` always decodes.
    #[serde(default)]
    pub digest_decoding: SegmentDecoding,
    /// Have `download` hash the copied bytes and compare them with a
    /// single-part (MD5) ETag.
    #[serde(default)]
    pub verify_md5_etag: bool,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            expected_host: DEFAULT_EXPECTED_HOST.to_string(),
            buffer_bytes: 64 * 1024,
            digest_decoding: SegmentDecoding::Raw,
            verify_md5_etag: false,
        }
    }
}

impl RetrieverConfig {
    /// `buffer_bytes` clamped to `1..=MAX_BUFFER_BYTES`.
    pub fn copy_buffer_len(&self) -> usize {
        self.buffer_bytes.clamp(1, MAX_BUFFER_BYTES)
    }
}

/// Global configuration loaded from `~/.config/s3get/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3getConfig {
    #[serde(flatten)]
    pub retriever: RetrieverConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("s3get")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<S3getConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = S3getConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: S3getConfig = toml::from_str(&data)?;
    if cfg.retriever.buffer_bytes != cfg.retriever.copy_buffer_len() {
        tracing::warn!(
            "buffer_bytes = {} in {} is out of range, using {}",
            cfg.retriever.buffer_bytes,
            path.display(),
            cfg.retriever.copy_buffer_len()
        );
    }
    Ok(cfg)
}
