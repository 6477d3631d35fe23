//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use webshield::{HttpServer, SharedConfig, ShieldComponents, ShieldConfig, Shutdown};

/// A server bound to an ephemeral loopback port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub config_tx: mpsc::UnboundedSender<ShieldConfig>,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub async fn start(config: ShieldConfig) -> Self {
        Self::start_with(ShieldComponents::new(SharedConfig::new(config))).await
    }

    pub async fn start_with(components: ShieldComponents) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (config_tx, config_rx) = mpsc::unbounded_channel();
        let shutdown = Shutdown::new();

        let server = HttpServer::with_components(components);
        let handle = tokio::spawn(server.run(listener, config_rx, shutdown.subscribe()));

        Self {
            addr,
            config_tx,
            shutdown,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked");
        assert!(result.is_ok());
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Retry `check` until it holds or a few seconds pass.
#[allow(dead_code)]
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}
