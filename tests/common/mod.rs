//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use whois_blob_gateway::config::GatewayConfig;
use whois_blob_gateway::registry::WhoisClient;
use whois_blob_gateway::{GatewayServer, RecordCache, RequestDispatcher, Shutdown};

/// A record carrying three blobs, plus a decoy ahead of the anchor.
pub const RECORD: &str = "\
inet6num:       2001:db8::/32
remarks:        rbs$/index.html$text/html$
remarks:        decoy
route6:         2001:db8::/32
descr:          example site
rbs$/index.html$text/html$
remarks:        <h1>hello</h1>
rbs$
rbs$/pixel.gif$image/gif$
remarks:        R0lGODlhAQABAAAAACw=
rbs$
rbs$/broken.bin$application/octet-stream$
remarks:        not*base64
rbs$
source:         TEST
";

/// A mock WHOIS server that answers every query with a fixed record.
pub struct MockWhois {
    pub addr: SocketAddr,
    queries: Arc<AtomicUsize>,
}

impl MockWhois {
    /// How many queries the server has answered.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

/// Start a mock WHOIS server on an ephemeral port.
pub async fn start_mock_whois(record: impl Into<String>) -> MockWhois {
    let record: Arc<str> = Arc::from(record.into());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let queries = Arc::new(AtomicUsize::new(0));
    let counter = queries.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let counter = counter.clone();
                    let record = record.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 256];
                        let mut query = Vec::new();
                        while !query.ends_with(b"\r\n") {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => query.extend_from_slice(&buf[..n]),
                            }
                        }
                        counter.fetch_add(1, Ordering::SeqCst);
                        let _ = socket.write_all(record.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockWhois { addr, queries }
}

/// Start a root server that refers every query to `target`.
pub async fn start_referring_whois(target: &MockWhois) -> MockWhois {
    start_mock_whois(format!(
        "% IANA WHOIS server\n\nrefer:        whois://{}\n",
        target.addr
    ))
    .await
}

/// A running gateway pointed at a mock registry.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub cache: RecordCache,
    pub shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Config whose registry is the given mock server.
pub fn config_for(whois: &MockWhois) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.registry.server = whois.addr.ip().to_string();
    config.registry.port = whois.addr.port();
    config.registry.timeout_secs = 2;
    config
}

/// Start the public server on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let cache = RecordCache::new();
    let registry = Arc::new(WhoisClient::new(&config.registry));
    let dispatcher =
        RequestDispatcher::new(registry, cache.clone(), config.client_key.default.clone());
    let shutdown = Shutdown::new();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = GatewayServer::new(&config, dispatcher);
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    TestGateway {
        addr,
        cache,
        shutdown,
    }
}
