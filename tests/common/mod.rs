//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Handle to a mock upstream: counts calls and captures the last
/// request body so byte-exact forwarding can be asserted.
#[derive(Clone)]
pub struct MockUpstream {
    calls: Arc<AtomicU32>,
    last_body: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MockUpstream {
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Vec<u8>> {
        self.last_body.lock().unwrap().clone()
    }
}

/// Start a mock upstream that answers every request with a fixed status
/// and body.
pub async fn start_mock_upstream(
    addr: SocketAddr,
    status: u16,
    response_body: &'static str,
) -> MockUpstream {
    let listener = TcpListener::bind(addr).await.unwrap();
    let handle = MockUpstream {
        calls: Arc::new(AtomicU32::new(0)),
        last_body: Arc::new(Mutex::new(None)),
    };
    let upstream = handle.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let upstream = upstream.clone();
                    tokio::spawn(async move {
                        let body = read_request_body(&mut socket).await;
                        upstream.calls.fetch_add(1, Ordering::SeqCst);
                        *upstream.last_body.lock().unwrap() = Some(body);

                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            response_body.len(),
                            response_body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    handle
}

/// Read one HTTP request off the socket and return its body bytes.
async fn read_request_body(socket: &mut TcpStream) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    let mut tmp = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos;
        }
        match socket.read(&mut tmp).await {
            Ok(0) | Err(_) => return Vec::new(),
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
        }
    };

    let content_length = parse_content_length(&buf[..header_end]);
    let total = header_end + 4 + content_length;
    while buf.len() < total {
        match socket.read(&mut tmp).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
        }
    }

    buf[header_end + 4..total.min(buf.len())].to_vec()
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn parse_content_length(headers: &[u8]) -> usize {
    let text = String::from_utf8_lossy(headers);
    text.lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}
