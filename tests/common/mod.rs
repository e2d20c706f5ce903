//! Shared test fixtures: an in-process stub backend and a scripted wallet.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use speedrush_sdk::error::SignerError;
use speedrush_sdk::prelude::*;

// ─── Stub backend ────────────────────────────────────────────────────────────

/// One request as the stub saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Minimal HTTP/1.1 responder. Each path carries a queue of JSON bodies,
/// served in order; a path with an exhausted (or missing) queue returns 404.
/// Every response closes the connection so request_count == connection count.
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _accept_loop: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(routes: Vec<(&str, Vec<&str>)>) -> Self {
        let mut map: HashMap<String, VecDeque<String>> = HashMap::new();
        for (path, bodies) in routes {
            map.insert(
                path.to_string(),
                bodies.into_iter().map(|b| b.to_string()).collect(),
            );
        }
        let routes = Arc::new(Mutex::new(map));
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().unwrap();

        let accept_routes = Arc::clone(&routes);
        let accept_requests = Arc::clone(&requests);
        let accept_loop = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let routes = Arc::clone(&accept_routes);
                let requests = Arc::clone(&accept_requests);
                tokio::spawn(async move {
                    let _ = handle_connection(stream, routes, requests).await;
                });
            }
        });

        Self {
            addr,
            requests,
            _accept_loop: accept_loop,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self._accept_loop.abort();
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    routes: Arc<Mutex<HashMap<String, VecDeque<String>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    // Read the head.
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_head_end(&buf) {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut authorization = None;
    let mut content_length = 0usize;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "authorization" => authorization = Some(value.trim().to_string()),
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                _ => {}
            }
        }
    }

    // Read the body.
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&body).to_string();

    requests.lock().unwrap().push(RecordedRequest {
        method,
        path: path.clone(),
        authorization,
        body,
    });

    let response_body = routes
        .lock()
        .unwrap()
        .get_mut(&path)
        .and_then(|queue| queue.pop_front());

    let response = match response_body {
        Some(json) => format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            json.len(),
            json
        ),
        None => {
            let json = r#"{"error":"not found"}"#;
            format!(
                "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                json.len(),
                json
            )
        }
    };

    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

// ─── Scripted wallet ─────────────────────────────────────────────────────────

/// Wallet collaborator for tests: fixed address, records every message it
/// is asked to sign, optionally declines.
pub struct MockSigner {
    address: Option<WalletAddress>,
    reject: bool,
    signed: Arc<Mutex<Vec<String>>>,
}

impl MockSigner {
    pub fn connected(address: &str) -> Self {
        Self {
            address: Some(WalletAddress::new(address)),
            reject: false,
            signed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            address: None,
            reject: false,
            signed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn rejecting(address: &str) -> Self {
        Self {
            reject: true,
            ..Self::connected(address)
        }
    }

    pub fn signed_messages(&self) -> Vec<String> {
        self.signed.lock().unwrap().clone()
    }
}

impl WalletSigner for MockSigner {
    fn address(&self) -> Option<WalletAddress> {
        self.address.clone()
    }

    async fn sign_message(&self, message: &str) -> Result<String, SignerError> {
        self.signed.lock().unwrap().push(message.to_string());
        if self.reject {
            return Err(SignerError::Rejected);
        }
        Ok(format!("0xsig({message})"))
    }
}

// ─── Client helpers ──────────────────────────────────────────────────────────

pub fn client_for(server: &StubServer) -> SpeedrushClient {
    SpeedrushClient::builder()
        .base_url(&server.url())
        .build()
        .expect("build client")
}

/// Routes for a clean three-step login against `nonce`/`token`/`balance`.
pub fn login_routes<'a>(
    nonce_json: &'a str,
    verify_json: &'a str,
    profile_json: &'a str,
) -> Vec<(&'static str, Vec<&'a str>)> {
    vec![
        ("/api/auth/nonce", vec![nonce_json]),
        ("/api/auth/verify", vec![verify_json]),
        ("/api/auth/profile", vec![profile_json]),
    ]
}
