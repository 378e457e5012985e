//! Chunked body copy with cancellation between chunks.

use std::io::{self, Read, Write};
use std::path::Path;

use crate::control::CancelToken;
use crate::error::RetrieveError;
use crate::store::StoreError;

/// Copies `src` into `dst` one buffer at a time, feeding each chunk to
/// `digest` if given. Returns the number of bytes copied.
///
/// Read failures are store errors, write failures are local write errors
/// against `dst_path`. `cancel` is checked before every read. Both ends are
/// taken by value and released before this returns, on every path.
pub(super) fn copy_chunks(
    mut src: impl Read,
    mut dst: impl Write,
    dst_path: &Path,
    buffer_bytes: usize,
    cancel: &CancelToken,
    mut digest: Option<&mut md5::Context>,
) -> Result<u64, RetrieveError> {
    let mut buf = vec![0u8; buffer_bytes.max(1)];
    let mut copied = 0u64;
    loop {
        if cancel.is_cancelled() {
            return Err(RetrieveError::Cancelled);
        }
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(StoreError::Body(e).into()),
        };
        dst.write_all(&buf[..n])
            .map_err(|e| RetrieveError::local_write(dst_path, e))?;
        if let Some(ctx) = digest.as_deref_mut() {
            ctx.consume(&buf[..n]);
        }
        copied += n as u64;
    }
    dst.flush()
        .map_err(|e| RetrieveError::local_write(dst_path, e))?;
    Ok(copied)
}
