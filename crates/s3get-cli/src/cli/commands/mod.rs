//! CLI command handlers. Each command is in its own file.

mod checksum;
mod digest;
mod fetch;

pub use checksum::run_checksum;
pub use digest::run_digest;
pub use fetch::run_fetch;

use anyhow::{Context, Result};
use s3get_core::config::S3getConfig;
use s3get_core::store::S3ObjectStore;
use s3get_core::{CancelToken, RemoteObjectRetriever};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Runtime, retriever, and a token that Ctrl-C sets.
///
/// The runtime must outlive the retriever: the S3 store blocks on its handle.
pub(crate) struct Session {
    pub retriever: RemoteObjectRetriever,
    pub cancel: CancelToken,
    _rt: Runtime,
}

impl Session {
    pub fn open(cfg: &S3getConfig) -> Result<Self> {
        let rt = Runtime::new().context("failed to start tokio runtime")?;
        let store = S3ObjectStore::connect(&cfg.store, rt.handle().clone());
        let retriever = RemoteObjectRetriever::new(Arc::new(store), cfg.retriever.clone());

        let cancel = CancelToken::new();
        let on_signal = cancel.clone();
        rt.spawn(async move {
            let mut received = 0u32;
            while tokio::signal::ctrl_c().await.is_ok() {
                received += 1;
                match on_interrupt(received, &on_signal) {
                    InterruptAction::Cancelled => {
                        tracing::info!("interrupt received, cancelling transfer");
                        eprintln!("cancelling; press Ctrl-C again to exit now");
                    }
                    InterruptAction::Exit(code) => {
                        tracing::warn!("second interrupt, exiting");
                        std::process::exit(code);
                    }
                }
            }
        });

        Ok(Self {
            retriever,
            cancel,
            _rt: rt,
        })
    }
}

/// Exit status after a second Ctrl-C (128 + SIGINT).
const INTERRUPT_EXIT_CODE: i32 = 130;

#[derive(Debug, PartialEq, Eq)]
enum InterruptAction {
    Cancelled,
    Exit(i32),
}

/// First Ctrl-C sets the token so the copy loop can stop cleanly. A call
/// blocked inside the store never sees it, so any later Ctrl-C exits.
fn on_interrupt(received: u32, cancel: &CancelToken) -> InterruptAction {
    if received <= 1 {
        cancel.cancel();
        InterruptAction::Cancelled
    } else {
        InterruptAction::Exit(INTERRUPT_EXIT_CODE)
    }
}

/// ETag as printed by the CLI: verbatim, or `-` when the store sent none.
pub(crate) fn display_etag(etag: Option<&str>) -> &str {
    etag.unwrap_or("-")
}
