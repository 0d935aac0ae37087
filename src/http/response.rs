//! Response rendering.
//!
//! Every reply is a JSON object with an `ok` flag. Mode-specific fields are
//! omitted when they do not apply. If encoding ever fails the client gets a
//! fixed 500 body instead.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::error::RelayError;
use crate::relay::{RelayMode, RelayOutcome};

/// Body sent when a response cannot be encoded.
pub const SERIALIZATION_FALLBACK: &[u8] = br#"{"ok": false, "error": "serialization error"}"#;

/// Outgoing `/relay` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RelayReply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<RelayMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayReply {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            mode: None,
            upstream: None,
            echo: None,
            error: Some(error.into()),
        }
    }
}

/// Encode `body` as JSON with `status`.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => json_bytes(status, bytes),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response");
            json_bytes(StatusCode::INTERNAL_SERVER_ERROR, SERIALIZATION_FALLBACK.to_vec())
        }
    }
}

fn json_bytes(status: StatusCode, bytes: Vec<u8>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        bytes,
    )
        .into_response()
}

impl From<RelayOutcome> for RelayReply {
    fn from(outcome: RelayOutcome) -> Self {
        let mode = Some(outcome.mode());
        match outcome {
            RelayOutcome::Forwarded(reply) => Self {
                ok: true,
                mode,
                upstream: Some(reply.body),
                echo: None,
                error: None,
            },
            RelayOutcome::Echoed(echo) => Self {
                ok: true,
                mode,
                upstream: None,
                echo: Some(echo),
                error: None,
            },
        }
    }
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        let status = self.status();
        json_response(status, &RelayReply::from(self))
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            RelayError::UpstreamRejected { upstream, .. } => RelayReply {
                ok: false,
                mode: Some(RelayMode::LivePass),
                upstream: Some(upstream),
                echo: None,
                error: None,
            },
            other => RelayReply::failure(other.to_string()),
        };
        json_response(status, &body)
    }
}
