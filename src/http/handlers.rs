//! Route handlers.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::RelayError;
use crate::http::request::{read_body, request_id};
use crate::http::response::json_response;
use crate::http::server::AppState;
use crate::observability::metrics;

/// `/health` body. Reports configuration only; downstream services are not probed.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub ok: bool,
    pub service: String,
    pub time: u64,
    pub dh_base_url: String,
    pub client_id_set: bool,
}

pub async fn health(State(state): State<AppState>) -> Response {
    let time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    json_response(
        StatusCode::OK,
        &HealthReport {
            ok: true,
            service: state.config.service.name.clone(),
            time,
            dh_base_url: state.config.broker.base_url.clone(),
            client_id_set: state.config.broker.client_id().is_some(),
        },
    )
}

/// `POST /relay`: classify, then forward or echo.
pub async fn relay(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id(request.headers());

    let result = match read_body(request.into_body(), state.config.limits.max_body_bytes).await {
        Ok(raw) => state.relay.handle(&raw, &request_id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => {
            let mode = outcome.mode().as_str();
            let status = outcome.status();
            tracing::info!(request_id = %request_id, mode, status = %status, "Relay request completed");
            metrics::record_request(mode, status.as_u16(), start);
            outcome.into_response()
        }
        Err(err) => {
            let status = err.status_code();
            tracing::warn!(
                request_id = %request_id,
                kind = err.kind(),
                status = %status,
                error = %err,
                "Relay request failed"
            );
            let mode = err.mode().map_or(metrics::UNCLASSIFIED, |m| m.as_str());
            metrics::record_request(mode, status.as_u16(), start);
            err.into_response()
        }
    }
}

/// Anything that is not `GET /health` or `POST /relay`.
pub async fn not_found() -> Response {
    RelayError::NotFound.into_response()
}
