//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use api_edge_proxy::config::ProxyConfig;
use api_edge_proxy::lifecycle::{startup, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const SPEC: &str = r#"
openapi: 3.0.0
info:
  title: test api
  version: 1.0.0
paths:
  /users/me:
    get: {}
    put: {}
  /users/{id}:
    get: {}
  /items/{id}:
    get: {}
    delete: {}
  /admin/secret:
    get: {}
"#;

/// A mock upstream that answers every request with the request head it
/// received as the body. Paths containing "secret" get a 403.
pub struct EchoBackend {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
}

pub async fn start_echo_backend() -> EchoBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                            }
                        }
                        counter.fetch_add(1, Ordering::SeqCst);

                        let head = String::from_utf8_lossy(&buf).into_owned();
                        let status_line = if head.lines().next().unwrap_or("").contains("secret") {
                            "403 Forbidden"
                        } else {
                            "200 OK"
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nX-Upstream: echo\r\nConnection: close\r\n\r\n{}",
                            status_line,
                            head.len(),
                            head
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    EchoBackend { addr, hits }
}

/// A running proxy and the temporary files backing it.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    _dir: tempfile::TempDir,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the proxy on an ephemeral port in front of `upstream`.
pub async fn start_proxy(upstream: &str) -> TestProxy {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path());

    // Reserve a free port for the proxy.
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = probe.local_addr().unwrap();
    drop(probe);

    let mut config = ProxyConfig::default();
    config.listener.bind_address = addr.to_string();
    config.upstream.url = upstream.to_string();
    config.upstream.host = "api.internal".to_string();
    config.api.spec_file = dir.path().join("openapi.yaml").to_str().unwrap().to_string();
    config.static_files.root = dir.path().join("web").to_str().unwrap().to_string();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = startup::run(config, &server_shutdown).await;
    });

    wait_until_listening(addr).await;

    TestProxy {
        addr,
        shutdown,
        _dir: dir,
    }
}

fn write_bundle(root: &Path) {
    std::fs::write(root.join("openapi.yaml"), SPEC).unwrap();
    let web = root.join("web");
    std::fs::create_dir_all(web.join("assets")).unwrap();
    std::fs::write(web.join("index.html"), "<html>spa</html>").unwrap();
    std::fs::write(web.join("assets/app.js"), "console.log('app')").unwrap();
}

async fn wait_until_listening(addr: SocketAddr) {
    for _ in 0..100 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("proxy did not start listening on {}", addr);
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
