//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Service identity reported by `/health`.
    pub service: ServiceConfig,

    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Broker order API settings.
    pub broker: BrokerConfig,

    /// Local secret service settings.
    pub secret: SecretConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "order-relay".to_string(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g., "127.0.0.1").
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 51839,
        }
    }
}

/// Broker order API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Base URL of the broker API (orders are posted to `{base_url}/v2/orders`).
    pub base_url: String,

    /// Value sent as the `Client-Id` header. Empty means unset.
    pub client_id: String,

    /// Total timeout for the order call in seconds.
    pub timeout_secs: u64,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_env_proxy: bool,
}

impl BrokerConfig {
    pub fn orders_url(&self) -> String {
        format!("{}/v2/orders", self.base_url.trim_end_matches('/'))
    }

    pub fn client_id(&self) -> Option<&str> {
        if self.client_id.is_empty() {
            None
        } else {
            Some(&self.client_id)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.dhan.co".to_string(),
            client_id: String::new(),
            timeout_secs: 7,
            use_env_proxy: true,
        }
    }
}

/// Secret service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecretConfig {
    /// URL answering `GET` with the bearer token.
    pub url: String,

    /// Total timeout for the token fetch in seconds.
    pub timeout_secs: u64,
}

impl SecretConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:51840/secret/read".to_string(),
            timeout_secs: 3,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 15 }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024, // 1MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Verbose request logging.
    pub debug: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            debug: true,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9091".to_string(),
        }
    }
}
