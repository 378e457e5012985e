//! CLI for the s3get artifact retriever.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use s3get_core::config;
use std::path::PathBuf;

use commands::{run_checksum, run_digest, run_fetch};

/// Top-level CLI for s3get.
#[derive(Debug, Parser)]
#[command(name = "s3get")]
#[command(about = "s3get: fetch build artifacts from S3 by URL", long_about = None)]
pub struct Cli {
    /// Accept object URLs on this host instead of the configured one.
    #[arg(long, global = true, value_name = "HOST")]
    pub expected_host: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download an object into a local file and print its ETag.
    Fetch {
        /// Object URL, e.g. https://s3-us-west-2.amazonaws.com/bucket/key.
        url: String,
        /// Destination file; missing parent directories are created.
        dest: PathBuf,
        /// Check the written bytes against a single-part (MD5) ETag.
        #[arg(long)]
        verify: bool,
    },

    /// Print the ETag of an object without downloading it to disk.
    Digest {
        /// Object URL.
        url: String,
    },

    /// Compute the MD5 of a local file, for comparison with a single-part ETag.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Fetch { url, dest, verify } => {
                let mut cfg = load_config(cli.expected_host)?;
                cfg.retriever.verify_md5_etag |= verify;
                run_fetch(&cfg, &url, &dest)?;
            }
            CliCommand::Digest { url } => run_digest(&load_config(cli.expected_host)?, &url)?,
            CliCommand::Checksum { path } => run_checksum(&path)?,
        }

        Ok(())
    }
}

/// Config file plus command-line overrides.
fn load_config(expected_host: Option<String>) -> Result<config::S3getConfig> {
    let mut cfg = config::load_or_init()?;
    if let Some(host) = expected_host {
        cfg.retriever.expected_host = host;
    }
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
