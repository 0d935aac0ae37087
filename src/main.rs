//! Order relay (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                  ORDER RELAY                   │
//!   Client request     │  ┌────────┐   ┌────────────┐                  │
//!   ───────────────────┼─▶│  http  │──▶│ classifier │                  │
//!                      │  │ server │   └─────┬──────┘                  │
//!                      │  └────────┘         │                         │
//!                      │          live ┌─────┴─────┐ legacy            │
//!                      │               ▼           ▼                   │
//!                      │        ┌────────────┐ ┌────────┐              │      Secret
//!                      │        │ credential │ │  echo  │              │◀──── service
//!                      │        └─────┬──────┘ └────────┘              │
//!                      │              ▼                                │
//!                      │        ┌────────────┐                         │      Broker
//!                      │        │ forwarder  │─────────────────────────┼────▶ /v2/orders
//!                      │        └────────────┘                         │
//!                      └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use order_relay::config::{load_config, SystemEnv};
use order_relay::lifecycle::{self, signals, Shutdown};
use order_relay::observability::logging;

#[derive(Parser)]
#[command(name = "order-relay")]
#[command(about = "Relay between a trading client, a local secret service and the broker API", long_about = None)]
struct Args {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref(), &SystemEnv)?;
    logging::init_logging(config.observability.debug);

    tracing::info!("order-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        dh_base_url = %config.broker.base_url,
        client_id_set = config.broker.client_id().is_some(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let prepared = lifecycle::prepare(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    prepared
        .server
        .run(prepared.listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
