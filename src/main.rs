//! Webshield server binary.
//!
//! ```text
//!     Client ──▶ listener ──▶ request id / trace ──▶ surface router
//!                                                     │
//!                    ┌────────────────────────────────┼──────────────────────┐
//!                    ▼                                ▼                      ▼
//!               /api/...                         /assets/...            everything else
//!       host → hardening → rate → ajax    host → hardening → rate    host → hardening → rate
//!              → api headers                   → static headers           → index headers
//!                    │                                │                      │
//!                JSON handler                     ServeDir               HTML shell
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use webshield::config::loader::load_config;
use webshield::config::watcher::ConfigWatcher;
use webshield::lifecycle::{spawn_signal_handler, Shutdown};
use webshield::observability::{logging, metrics};
use webshield::{BuildInfo, HttpServer, ShieldConfig};

#[derive(Parser, Debug)]
#[command(name = "webshield", version, about = "Security filtering front for a web application")]
struct Args {
    /// Path to the TOML configuration file; defaults apply when omitted
    #[arg(short, long, env = "WEBSHIELD_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ShieldConfig::default(),
    };

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("failed to initialise logging: {e}");
    }

    tracing::info!(build = %BuildInfo::current(), "webshield starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        host = %config.general.host,
        force_ssl = config.general.force_ssl,
        burst = config.rate_limit.burst_size,
        per_second = config.rate_limit.requests_per_second,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher handle must outlive the server or reloads stop.
    let (config_rx, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            match watcher.run() {
                Ok(handle) => (rx, Some(handle)),
                Err(e) => {
                    tracing::warn!(error = %e, "Config hot reload disabled");
                    (rx, None)
                }
            }
        }
        None => {
            let (_tx, rx) = mpsc::unbounded_channel();
            (rx, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config);
    server.run(listener, config_rx, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
