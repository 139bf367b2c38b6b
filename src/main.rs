//! Allow-listed forwarding proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                FORWARDING PROXY                │
//!   Caller                │                                               │
//!   GET /api/proxy?url=   │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   ──────────────────────┼─▶│  http  │──▶│ handlers │──▶│  upstream  │──┼──▶ Upstream API
//!                         │  │ server │   │  method, │   │  prefix +  │  │
//!                         │  │ + cors │   │  url arg │   │  forward   │  │
//!   ◀─────────────────────┼──│        │◀──│          │◀──│  envelope  │◀─┼───
//!   JSON + _proxy         │  └────────┘   └──────────┘   └────────────┘  │
//!                         │                                               │
//!                         │  config · observability · lifecycle            │
//!                         └───────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use fallback_proxy::config::{load_config, ProxyConfig};
use fallback_proxy::observability::{logging, metrics};
use fallback_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "fallback-proxy")]
#[command(about = "Forward allow-listed upstream API requests", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("fallback-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        allowed_origin = %config.upstream.allowed_origin,
        upstream_timeout_secs = config.timeouts.upstream_secs,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signals();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
