//! In-memory `ObjectStore` that records every request and tracks body lifetimes.

use s3get_core::store::{ObjectStore, RetrievedObject, StoreError};
use std::collections::HashMap;
use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

/// Pair of barriers a body waits on before its first read: the test thread
/// meets `started`, does something, then meets `resume`.
#[derive(Clone)]
pub struct Gate {
    pub started: Arc<Barrier>,
    pub resume: Arc<Barrier>,
}

impl Gate {
    pub fn new() -> Self {
        Self {
            started: Arc::new(Barrier::new(2)),
            resume: Arc::new(Barrier::new(2)),
        }
    }
}

#[derive(Clone)]
pub struct FakeObject {
    etag: Option<String>,
    body: Vec<u8>,
    chunk: usize,
    fail_after: Option<usize>,
    gate: Option<Gate>,
}

impl FakeObject {
    pub fn new(etag: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            etag: etag.map(str::to_string),
            body: body.into(),
            chunk: 1024,
            fail_after: None,
            gate: None,
        }
    }

    /// Body reads return at most `chunk` bytes each.
    pub fn chunked(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    /// Body read fails with a connection reset once `n` bytes were served.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[derive(Default)]
pub struct FakeStore {
    objects: HashMap<(String, String), FakeObject>,
    requests: Mutex<Vec<(String, String)>>,
    bodies_dropped: Arc<AtomicUsize>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, bucket: &str, key: &str, object: FakeObject) -> Self {
        self.objects
            .insert((bucket.to_string(), key.to_string()), object);
        self
    }

    /// Number of `get_object` calls so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bodies_dropped(&self) -> usize {
        self.bodies_dropped.load(Ordering::SeqCst)
    }
}

impl ObjectStore for FakeStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<RetrievedObject, StoreError> {
        self.requests
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        let object = self
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })?;
        let body = TrackedBody {
            object: object.clone(),
            pos: 0,
            dropped: Arc::clone(&self.bodies_dropped),
        };
        Ok(RetrievedObject::new(object.etag.clone(), body))
    }
}

struct TrackedBody {
    object: FakeObject,
    pos: usize,
    dropped: Arc<AtomicUsize>,
}

impl Read for TrackedBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(gate) = self.object.gate.take() {
            gate.started.wait();
            gate.resume.wait();
        }
        if let Some(limit) = self.object.fail_after {
            if self.pos >= limit {
                return Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                ));
            }
        }
        let end = self
            .object
            .fail_after
            .unwrap_or(usize::MAX)
            .min(self.object.body.len());
        let n = (end - self.pos).min(self.object.chunk).min(buf.len());
        buf[..n].copy_from_slice(&self.object.body[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }
}
