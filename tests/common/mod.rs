//! Shared utilities for integration testing against mock endpoints.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Install the env-filtered log subscriber; repeated calls are no-ops.
/// Run tests with `RUST_LOG=debug` to see client-side tracing.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Start a mock relay that answers every request with a fixed status and
/// JSON body. Returns the bound address.
pub async fn start_mock_relay(status: u16, body: &'static str) -> SocketAddr {
    start_programmable_relay(move || async move { (status, body.to_string()) }).await
}

/// Start a mock relay whose responses come from an async callback.
/// Returns the bound address; the listener runs until the test exits.
pub async fn start_programmable_relay<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        // Drain the request head so the client does not see
                        // a reset while still writing.
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock JSON-RPC endpoint answering every request with a fixed
/// `eth_chainId` result, echoing the caller's request id. Returns the
/// bound address.
pub async fn start_chain_endpoint(chain_id: u64) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let request = read_request(&mut socket).await;
                        let id = request_id_field(&request);
                        let body =
                            format!(r#"{{"jsonrpc":"2.0","id":{id},"result":"{chain_id:#x}"}}"#);
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Read until the JSON request body has fully arrived (headers and body
/// may land in separate reads).
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                data.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&data);
                if let Some((_, body)) = text.split_once("\r\n\r\n") {
                    if body.contains('}') {
                        break;
                    }
                }
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

/// Numeric `id` field of a JSON-RPC request, defaulting to 0.
fn request_id_field(request: &str) -> u64 {
    request
        .rsplit_once("\"id\":")
        .and_then(|(_, rest)| {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .unwrap_or(0)
}

/// Relay body for a successful submission carrying the given request id.
pub fn accepted_body(request_id: &str) -> String {
    format!(r#"{{"code":200,"data":{{"requestId":"{request_id}"}}}}"#)
}

/// Relay body for a rejected submission with the given code.
pub fn rejected_body(code: u16) -> String {
    format!(r#"{{"code":{code},"error":{{"message":"rejected"}}}}"#)
}
