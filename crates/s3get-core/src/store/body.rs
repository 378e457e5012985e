//! Blocking `Read` over the SDK's async body stream.

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::io::{self, Read};
use tokio::runtime::Handle;

/// Pulls one chunk at a time from `stream` by blocking on `handle`.
///
/// Must not be read from inside an async context.
pub(super) struct ByteStreamReader {
    stream: ByteStream,
    handle: Handle,
    pending: Bytes,
}

impl ByteStreamReader {
    pub(super) fn new(stream: ByteStream, handle: Handle) -> Self {
        Self {
            stream,
            handle,
            pending: Bytes::new(),
        }
    }
}

impl Read for ByteStreamReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pending.is_empty() {
            match self.handle.block_on(self.stream.try_next()) {
                Ok(Some(chunk)) => self.pending = chunk,
                Ok(None) => return Ok(0),
                Err(e) => return Err(io::Error::other(e)),
            }
        }
        let n = buf.len().min(self.pending.len());
        let chunk = self.pending.split_to(n);
        buf[..n].copy_from_slice(&chunk);
        Ok(n)
    }
}
