//! Logging init: append to a file under the XDG state dir, or stderr.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Library and binary at debug, dependencies (SDK, hyper) at info.
const DEFAULT_FILTER: &str = "info,s3get=debug,s3get_core=debug";

/// `RUST_LOG` when set and valid, otherwise `DEFAULT_FILTER`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/s3get/s3get.log`.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("s3get")?;
    Ok(xdg_dirs.get_state_home().join("s3get").join("s3get.log"))
}

/// Send `tracing` output to the log file, returning its path.
///
/// Errors when the file cannot be opened or a subscriber is already set, so
/// the caller can fall back to `init_logging_stderr`.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::debug!("logging to {}", path.display());
    Ok(path)
}

/// Log to stderr only. Used when `init_logging` fails.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        let filter = EnvFilter::try_new(DEFAULT_FILTER).unwrap();
        let shown = filter.to_string();
        assert!(shown.contains("s3get_core=debug"), "{shown}");
    }

    #[test]
    fn log_file_lives_in_state_dir() {
        let path = log_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "s3get.log");
        assert!(path.parent().unwrap().ends_with("s3get"));
    }
}
