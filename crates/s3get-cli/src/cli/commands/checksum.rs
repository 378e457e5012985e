//! Checksum command: MD5 of a local file, comparable with single-part ETags.

use anyhow::Result;
use s3get_core::checksum;
use std::path::Path;

/// Compute and print the MD5 of the given file.
pub fn run_checksum(path: &Path) -> Result<()> {
    let digest = checksum::md5_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
