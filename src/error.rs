//! Error taxonomy for the relay.
//!
//! Every failure on the request path ends up as one of these variants and is
//! rendered as a JSON body with `ok: false` (see `http::response`).

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::relay::RelayMode;

/// Errors that can occur while handling a relay request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Body is not a JSON object.
    #[error("Invalid JSON body")]
    InvalidBody,

    /// Body exceeded the configured limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// `dhBody` present but not an object.
    #[error("`dhBody` must be a JSON object")]
    InvalidPayloadShape,

    /// `dhBody` lacks required order keys.
    #[error("`dhBody` missing: {}", .0.join(", "))]
    MissingOrderFields(Vec<&'static str>),

    /// Legacy body lacks required keys.
    #[error("Missing fields: {}", .0.join(", "))]
    MissingLegacyFields(Vec<&'static str>),

    /// Secret service unreachable, timed out, or gave an unusable answer.
    #[error("Token service error: {0}")]
    CredentialService(String),

    /// Broker answered with a non-2xx status.
    #[error("Upstream rejected order with status {status}")]
    UpstreamRejected { status: StatusCode, upstream: Value },

    /// No usable response from the broker.
    #[error("Upstream relay error: {0}")]
    UpstreamTransport(String),

    /// No route for method and path.
    #[error("Not found")]
    NotFound,
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidBody => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::InvalidPayloadShape
            | RelayError::MissingOrderFields(_)
            | RelayError::MissingLegacyFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RelayError::CredentialService(_) => StatusCode::BAD_GATEWAY,
            RelayError::UpstreamRejected { status, .. } => *status,
            RelayError::UpstreamTransport(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Mode the request had been classified into when it failed, if any.
    pub fn mode(&self) -> Option<RelayMode> {
        match self {
            RelayError::InvalidPayloadShape
            | RelayError::MissingOrderFields(_)
            | RelayError::CredentialService(_)
            | RelayError::UpstreamRejected { .. }
            | RelayError::UpstreamTransport(_) => Some(RelayMode::LivePass),
            RelayError::MissingLegacyFields(_) => Some(RelayMode::LegacyPaper),
            RelayError::InvalidBody | RelayError::PayloadTooLarge | RelayError::NotFound => None,
        }
    }

    /// Short label used for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::InvalidBody => "invalid_body",
            RelayError::PayloadTooLarge => "payload_too_large",
            RelayError::InvalidPayloadShape => "invalid_payload_shape",
            RelayError::MissingOrderFields(_) | RelayError::MissingLegacyFields(_) => {
                "missing_fields"
            }
            RelayError::CredentialService(_) => "credential_service",
            RelayError::UpstreamRejected { .. } => "upstream_rejected",
            RelayError::UpstreamTransport(_) => "upstream_transport",
            RelayError::NotFound => "not_found",
        }
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// Failure to construct the outbound HTTP clients at startup.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("Failed to build {target} HTTP client: {source}")]
    Http {
        target: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Client id is not a valid header value")]
    InvalidClientId,
}
