//! Order relay library.
//!
//! Sits between a trading client, a local secret service and the broker
//! order API. `POST /relay` either forwards a `dhBody` order with a freshly
//! fetched bearer token (live pass-through) or echoes legacy paper fields.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use error::RelayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
