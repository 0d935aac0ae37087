//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → logging.rs (structured log events, request ID on every line)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log events and on to the broker
//! - Bearer tokens never reach a log line
//! - Metrics are cheap (atomic increments) and off by default

pub mod logging;
pub mod metrics;
