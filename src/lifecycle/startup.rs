//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Build the relay clients and router
//! - Bind the listener last (traffic only when ready)
//!
//! Any startup error is fatal.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::error::ClientBuildError;
use crate::http::HttpServer;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build upstream clients: {0}")]
    Clients(#[from] ClientBuildError),
}

/// A server ready to `run`, with its bound listener.
pub struct Prepared {
    pub server: HttpServer,
    pub listener: TcpListener,
    pub local_addr: SocketAddr,
}

pub async fn prepare(config: RelayConfig) -> Result<Prepared, StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.listener.bind_address();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| StartupError::Bind {
        address: address.clone(),
        source,
    })?;

    tracing::info!(address = %local_addr, "Listening for connections");

    Ok(Prepared {
        server,
        listener,
        local_addr,
    })
}
