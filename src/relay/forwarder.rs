//! Broker order forwarding.
//!
//! # Outcomes
//! - 2xx: decoded body with the broker's status, `ok: true`
//! - non-2xx: [`RelayError::UpstreamRejected`] carrying status and decoded body
//! - no response at all: [`RelayError::UpstreamTransport`] (504)
//!
//! No retries: a POST to the order endpoint is not idempotent.

use axum::http::StatusCode;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};

use crate::config::BrokerConfig;
use crate::error::{ClientBuildError, RelayError, RelayResult};
use crate::http::X_REQUEST_ID;
use crate::observability::metrics;
use crate::relay::classifier::OrderPayload;
use crate::relay::credential::BearerToken;

pub const CLIENT_ID_HEADER: &str = "Client-Id";

/// Accepted broker reply.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
}

/// Client for the broker order API.
#[derive(Clone)]
pub struct BrokerClient {
    client: reqwest::Client,
    orders_url: String,
    client_id: Option<HeaderValue>,
}

impl BrokerClient {
    pub fn new(config: &BrokerConfig) -> Result<Self, ClientBuildError> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout());
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|source| ClientBuildError::Http {
                target: "broker",
                source,
            })?;

        let client_id = match config.client_id() {
            Some(id) => Some(
                HeaderValue::from_str(id).map_err(|_| ClientBuildError::InvalidClientId)?,
            ),
            None => None,
        };

        Ok(Self {
            client,
            orders_url: config.orders_url(),
            client_id,
        })
    }

    pub fn orders_url(&self) -> &str {
        &self.orders_url
    }

    /// Submit `order` to the broker using `token`.
    pub async fn place_order(
        &self,
        order: &OrderPayload,
        token: &BearerToken,
        request_id: &str,
    ) -> RelayResult<UpstreamReply> {
        let payload = serde_json::to_vec(order.as_map())
            .map_err(|e| RelayError::UpstreamTransport(e.to_string()))?;

        let mut request = self
            .client
            .post(&self.orders_url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, token.header_value())
            .header(X_REQUEST_ID, request_id)
            .body(payload);
        if let Some(client_id) = &self.client_id {
            request = request.header(CLIENT_ID_HEADER, client_id.clone());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream_call("broker", "transport_error");
                tracing::warn!(request_id = %request_id, timeout = e.is_timeout(), error = %e, "Broker unreachable");
                return Err(RelayError::UpstreamTransport(e.to_string()));
            }
        };

        // reqwest and axum share the `http` crate, so the status carries over as-is.
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            metrics::record_upstream_call("broker", "transport_error");
            RelayError::UpstreamTransport(e.to_string())
        })?;
        let body = decode_upstream_body(&text);

        if status.is_success() {
            metrics::record_upstream_call("broker", "accepted");
            tracing::info!(request_id = %request_id, status = %status, "Broker accepted order");
            Ok(UpstreamReply { status, body })
        } else {
            metrics::record_upstream_call("broker", "rejected");
            tracing::warn!(request_id = %request_id, status = %status, "Broker rejected order");
            Err(RelayError::UpstreamRejected {
                status,
                upstream: body,
            })
        }
    }
}

/// JSON if it parses, otherwise `{"raw": text}`.
pub fn decode_upstream_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}
