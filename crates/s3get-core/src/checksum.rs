//! MD5 of local files and single-part ETag parsing.
//!
//! `download` hashes inline while copying when `verify_md5_etag` is set;
//! `md5_path` recomputes the same digest from a file already on disk.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute MD5 of a file and return the digest as lowercase hex.
pub fn md5_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut ctx = md5::Context::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            return Ok(hex::encode(ctx.compute().0));
        }
        ctx.consume(&buf[..n]);
    }
}

/// Returns the MD5 hex carried by a single-part ETag (`"<32 hex>"`), lowercased.
///
/// Multipart ETags (`"<hex>-<parts>"`) and anything else return `None`:
/// those are not a digest of the object bytes.
pub fn md5_from_etag(etag: &str) -> Option<String> {
    let trimmed = etag.trim().trim_matches('"');
    if trimmed.len() == 32 && trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(trimmed.to_ascii_lowercase())
    } else {
        None
    }
}
