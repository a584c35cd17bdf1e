//! Test server and raw HTTP client.

use std::net::SocketAddr;
use std::sync::Arc;

use secretaria::config::{Database, Server as ServerConfig};
use secretaria::db::{ConnectFuture, Provider};
use secretaria::{Router, Store, server};
use serde_json::Value;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// A running server plus the directory holding its database.
pub struct TestApp {
    pub server: server::Server,
    _dir: Option<TempDir>,
}

impl TestApp {
    pub fn addr(&self) -> SocketAddr {
        self.server.addr()
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        send(self.addr(), "GET", path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        send(self.addr(), "POST", path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> (u16, Value) {
        send(self.addr(), "PUT", path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> (u16, Value) {
        send(self.addr(), "DELETE", path, None).await
    }

    pub async fn stop(self) {
        self.server.shutdown().await.unwrap();
    }
}

fn listen_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        prefix: "/api".to_string(),
    }
}

async fn start_with_provider(db: Arc<dyn Provider>) -> server::Server {
    let config = listen_config();
    let mut router = Router::with_prefix(config.prefix.clone());
    secretaria::school::register(&mut router);

    server::start(&config, db, router.into_handle())
        .await
        .expect("failed to start test server")
}

/// Start a server over an empty, bootstrapped database.
pub async fn start() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let database = Database {
        url: dir.path().join("escola.db").display().to_string(),
        auth_token: None,
        bootstrap: true,
    };
    let store = Store::open(&database).await.expect("failed to open store");

    TestApp {
        server: start_with_provider(Arc::new(store)).await,
        _dir: Some(dir),
    }
}

/// Provider whose every connection attempt fails.
pub struct Unreachable;

impl Provider for Unreachable {
    fn connect(&self) -> ConnectFuture<'_> {
        Box::pin(async { Err(secretaria::Error::Connectivity) })
    }
}

/// Start a server whose database can never be reached.
pub async fn start_unreachable() -> TestApp {
    TestApp {
        server: start_with_provider(Arc::new(Unreachable)).await,
        _dir: None,
    }
}

/// Send a raw HTTP/1.1 request with `Connection: close` and read the full response.
pub async fn raw_request(addr: SocketAddr, payload: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.expect("failed to connect");
    stream.write_all(payload).await.expect("failed to write");

    let mut buf = Vec::new();
    let _ = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        stream.read_to_end(&mut buf),
    )
    .await;
    buf
}

/// Split a raw response into status code, header block and body.
pub fn parse_response(raw: &[u8]) -> (u16, String, Vec<u8>) {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response without header terminator");
    let head = String::from_utf8_lossy(&raw[..split]).into_owned();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("response without status code");
    (status, head, raw[split + 4..].to_vec())
}

/// Send a JSON request and decode the JSON response.
pub async fn send(addr: SocketAddr, method: &str, path: &str, body: Option<&Value>) -> (u16, Value) {
    let payload = body.map(Value::to_string).unwrap_or_default();
    send_raw_body(addr, method, path, &payload).await
}

/// Send a request whose body is given verbatim.
pub async fn send_raw_body(addr: SocketAddr, method: &str, path: &str, payload: &str) -> (u16, Value) {
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    let raw = raw_request(addr, request.as_bytes()).await;
    let (status, _, body) = parse_response(&raw);
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("non-JSON body for {method} {path}: {e}"));
    (status, json)
}
