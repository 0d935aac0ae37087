//! Request handling.
//!
//! # Responsibilities
//! - Request ID header name and extraction
//! - Bounded body read
//!
//! The ID itself is generated by `SetRequestIdLayer` (UUID v4) before the
//! handler runs, echoed on the response and forwarded to the broker.

use axum::body::{Body, Bytes};
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::error::{RelayError, RelayResult};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID assigned to this request, or a fresh one if the layer did not run.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Collect the body, failing once it exceeds `limit` bytes.
pub async fn read_body(body: Body, limit: usize) -> RelayResult<Bytes> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        // Also reached when the client disconnects mid-body; nobody reads that response.
        tracing::debug!(error = %e, limit, "Failed to read request body");
        RelayError::PayloadTooLarge
    })
}
