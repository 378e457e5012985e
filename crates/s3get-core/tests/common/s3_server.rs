//! Minimal HTTP/1.1 server answering path-style S3 GetObject for integration tests.
//!
//! Serves a fixed set of objects keyed by `/bucket/key`. Known objects get
//! 200 with an ETag header, paths under `/private/` get a 403 AccessDenied
//! error document, everything else gets a 404 NoSuchKey error document.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct ServedObject {
    pub etag: String,
    pub body: Vec<u8>,
}

/// Starts a server in a background thread. Returns the endpoint URL
/// (e.g. "http://127.0.0.1:12345"). The server runs until the process exits.
pub fn start(objects: HashMap<String, ServedObject>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let objects = Arc::new(objects);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let objects = Arc::clone(&objects);
            thread::spawn(move || handle(stream, &objects));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: std::net::TcpStream, objects: &HashMap<String, ServedObject>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut request = Vec::new();
    let mut buf = [0u8; 8192];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let request = match std::str::from_utf8(&request) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path) = parse_request_line(request);
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(
            b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    if let Some(obj) = objects.get(path) {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nETag: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
            obj.body.len(),
            obj.etag
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(&obj.body);
        return;
    }

    let (status, code) = if path.starts_with("/private/") {
        ("403 Forbidden", "AccessDenied")
    } else {
        ("404 Not Found", "NoSuchKey")
    };
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Error><Code>{}</Code><Message>{}</Message><RequestId>test</RequestId></Error>",
        code, path
    );
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: application/xml\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Returns (method, path without query) from the request line.
fn parse_request_line(request: &str) -> (&str, &str) {
    let line = request.lines().next().unwrap_or("");
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");
    let path = target.split('?').next().unwrap_or("");
    (method, path)
}
