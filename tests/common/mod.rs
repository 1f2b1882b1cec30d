//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use json_size_guard::config::{GuardConfig, LimitConfig, RouteConfig};
use json_size_guard::http::HttpServer;
use json_size_guard::lifecycle::Shutdown;

/// Config with one route `Upload::store` on `/upload` limited to `max_bytes`.
#[allow(dead_code)]
pub fn upload_config(max_bytes: i64) -> GuardConfig {
    let mut config = GuardConfig::default();
    config.routes.push(RouteConfig {
        name: "Upload::store".into(),
        host: None,
        path_prefix: Some("/upload".into()),
        method: None,
        priority: 10,
    });
    config.limits.push(LimitConfig {
        handler: "Upload".into(),
        action: Some("store".into()),
        max_bytes,
    });
    config
}

/// Start a mock backend that reads the whole request and replies with a fixed body.
///
/// The request body is drained so the client never sees a reset mid-upload.
#[allow(dead_code)]
pub async fn start_mock_backend(addr: SocketAddr, response: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        drain_request(&mut socket).await;
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.len(),
                            response
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
}

async fn drain_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut remaining = content_length.saturating_sub(buf.len() - header_end);
    while remaining > 0 {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => remaining = remaining.saturating_sub(n),
        }
    }
}

/// A guard server running in the background.
#[allow(dead_code)]
pub struct RunningGuard {
    pub addr: SocketAddr,
    pub config_updates: mpsc::UnboundedSender<GuardConfig>,
    pub shutdown: Shutdown,
}

/// Start the guard on `addr` and wait until it accepts connections.
#[allow(dead_code)]
pub async fn start_guard(addr: SocketAddr, mut config: GuardConfig) -> RunningGuard {
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind(addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    RunningGuard {
        addr,
        config_updates: config_tx,
        shutdown,
    }
}
