//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! collected rather than stopping at the first.

use axum::http::HeaderValue;
use url::Url;

use crate::config::schema::RelayConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError {
            field: "listener.host",
            message: "must not be empty".to_string(),
        });
    }

    check_http_url("broker.base_url", &config.broker.base_url, &mut errors);
    check_http_url("secret.url", &config.secret.url, &mut errors);

    for (field, value) in [
        ("broker.timeout_secs", config.broker.timeout_secs),
        ("secret.timeout_secs", config.secret.timeout_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError {
                field,
                message: "must be greater than zero".to_string(),
            });
        }
    }

    // The request timeout answers with a bare 408; it must outlast both hops.
    let hop_budget = config
        .secret
        .timeout_secs
        .saturating_add(config.broker.timeout_secs);
    if config.timeouts.request_secs != 0 && config.timeouts.request_secs <= hop_budget {
        errors.push(ValidationError {
            field: "timeouts.request_secs",
            message: format!(
                "must exceed secret.timeout_secs + broker.timeout_secs ({}s)",
                hop_budget
            ),
        });
    }

    if let Some(client_id) = config.broker.client_id() {
        if HeaderValue::from_str(client_id).is_err() {
            errors.push(ValidationError {
                field: "broker.client_id",
                message: "not a valid header value".to_string(),
            });
        }
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError {
            field: "limits.max_body_bytes",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address",
            message: format!("not a socket address: {}", config.observability.metrics_address),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError {
            field,
            message: format!("unsupported scheme {:?}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field,
            message: format!("invalid URL {:?}: {}", value, e),
        }),
    }
}
