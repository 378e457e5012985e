//! `s3get fetch` – download an object and print its ETag.

use anyhow::{Context, Result};
use s3get_core::config::S3getConfig;
use std::path::Path;

use super::{display_etag, Session};

pub fn run_fetch(cfg: &S3getConfig, url: &str, dest: &Path) -> Result<()> {
    let session = Session::open(cfg)?;
    let etag = session
        .retriever
        .download_with(url, dest, &session.cancel)
        .with_context(|| format!("fetch {}", url))?;
    println!("{}  {}", display_etag(etag.as_deref()), dest.display());
    Ok(())
}
