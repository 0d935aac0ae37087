//! Structured logging.
//!
//! `RUST_LOG` always wins. Without it the debug flag picks between a verbose
//! per-request filter and a quiet one.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "order_relay=debug,tower_http=debug";
const QUIET_FILTER: &str = "order_relay=info,tower_http=warn";

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        VERBOSE_FILTER
    } else {
        QUIET_FILTER
    }
}

/// Install the global subscriber. Call once from `main`.
pub fn init_logging(debug: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug).into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
