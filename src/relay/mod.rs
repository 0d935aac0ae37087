//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! raw body
//!     → classifier.rs (decode, pick mode, validate keys)
//!     → Live:   credential.rs (fetch bearer token)
//!               → forwarder.rs (POST {base_url}/v2/orders)
//!     → Legacy: echo the five fields, no network
//!     → RelayOutcome | RelayError
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing survives a request except the shared HTTP pools
//! - Each step returns `Result`; the first failure ends the request
//! - Nothing is retried

pub mod classifier;
pub mod credential;
pub mod forwarder;

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::config::RelayConfig;
use crate::error::{ClientBuildError, RelayResult};

pub use classifier::{classify, LegacyOrder, OrderPayload, RelayRequest};
pub use credential::{BearerToken, CredentialFetcher};
pub use forwarder::{BrokerClient, UpstreamReply};

/// Processing mode, as reported in the `mode` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelayMode {
    #[serde(rename = "live-pass")]
    LivePass,
    #[serde(rename = "legacy-paper")]
    LegacyPaper,
}

impl RelayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayMode::LivePass => "live-pass",
            RelayMode::LegacyPaper => "legacy-paper",
        }
    }
}

/// Successful result of one relay request.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    /// Broker accepted the order.
    Forwarded(UpstreamReply),
    /// Legacy fields echoed back.
    Echoed(Value),
}

impl RelayOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayOutcome::Forwarded(reply) => reply.status,
            RelayOutcome::Echoed(_) => StatusCode::OK,
        }
    }

    pub fn mode(&self) -> RelayMode {
        match self {
            RelayOutcome::Forwarded(_) => RelayMode::LivePass,
            RelayOutcome::Echoed(_) => RelayMode::LegacyPaper,
        }
    }
}

/// Composes classifier, credential fetcher and broker client.
#[derive(Clone)]
pub struct Relay {
    credentials: CredentialFetcher,
    broker: BrokerClient,
}

impl Relay {
    pub fn new(credentials: CredentialFetcher, broker: BrokerClient) -> Self {
        Self {
            credentials,
            broker,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, ClientBuildError> {
        Ok(Self::new(
            CredentialFetcher::new(&config.secret)?,
            BrokerClient::new(&config.broker)?,
        ))
    }

    /// Process one request body end to end.
    pub async fn handle(&self, raw: &[u8], request_id: &str) -> RelayResult<RelayOutcome> {
        match classify(raw)? {
            RelayRequest::Live(order) => {
                tracing::debug!(request_id = %request_id, "Live pass-through");
                let token = self.credentials.fetch().await?;
                let reply = self.broker.place_order(&order, &token, request_id).await?;
                Ok(RelayOutcome::Forwarded(reply))
            }
            RelayRequest::Legacy(order) => {
                tracing::debug!(request_id = %request_id, "Legacy paper echo");
                Ok(RelayOutcome::Echoed(order.into_echo()))
            }
        }
    }
}
