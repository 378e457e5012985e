//! `s3get digest` – print an object's ETag.

use anyhow::{Context, Result};
use s3get_core::config::S3getConfig;

use super::{display_etag, Session};

pub fn run_digest(cfg: &S3getConfig, url: &str) -> Result<()> {
    let session = Session::open(cfg)?;
    let etag = session
        .retriever
        .digest_with(url, &session.cancel)
        .with_context(|| format!("digest {}", url))?;
    println!("{}", display_etag(etag.as_deref()));
    Ok(())
}
