//! Shared utilities for integration testing.
//!
//! Mock upstreams are small axum apps on ephemeral ports. Each records the
//! requests it receives so tests can assert on hop counts and headers.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use order_relay::config::RelayConfig;
use order_relay::{HttpServer, Shutdown};

/// What a mock upstream answers with.
#[derive(Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
    /// Answer with the request body instead of `body`.
    pub echo_request: bool,
}

#[allow(dead_code)]
impl MockReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
            echo_request: false,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn echoing(mut self) -> Self {
        self.echo_request = true;
        self
    }
}

/// A request seen by a mock upstream.
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct Captured {
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    hits: Arc<AtomicUsize>,
    captured: Arc<Mutex<Vec<Captured>>>,
}

/// Handle to a running mock upstream.
pub struct MockServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    captured: Arc<Mutex<Vec<Captured>>>,
}

#[allow(dead_code)]
impl MockServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<Captured> {
        self.captured.lock().unwrap().last().cloned()
    }
}

async fn mock_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.captured.lock().unwrap().push(Captured {
        headers,
        body: body.clone(),
    });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }

    let status = StatusCode::from_u16(state.reply.status).unwrap();
    let body = if state.reply.echo_request {
        body
    } else {
        Bytes::from(state.reply.body.clone())
    };
    (status, body)
}

async fn serve_mock(router: Router<MockState>, reply: MockReply) -> MockServer {
    let hits = Arc::new(AtomicUsize::new(0));
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply,
        hits: hits.clone(),
        captured: captured.clone(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router.with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockServer {
        addr,
        hits,
        captured,
    }
}

/// Mock secret service answering `GET /secret/read`.
pub async fn start_secret_service(reply: MockReply) -> MockServer {
    serve_mock(Router::new().route("/secret/read", get(mock_handler)), reply).await
}

/// Mock broker answering `POST /v2/orders`.
pub async fn start_broker(reply: MockReply) -> MockServer {
    serve_mock(Router::new().route("/v2/orders", post(mock_handler)), reply).await
}

/// An address with nothing listening on it.
#[allow(dead_code)]
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config pointing at the given upstreams, bound to an ephemeral port.
pub fn relay_config(secret_url: String, broker_base_url: String) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.port = 0;
    config.secret.url = secret_url;
    config.secret.timeout_secs = 1;
    config.broker.base_url = broker_base_url;
    config.broker.timeout_secs = 1;
    config.broker.use_env_proxy = false;
    config
}

/// Running relay plus the handle that stops it.
pub struct RelayHandle {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl RelayHandle {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RelayHandle {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn spawn_relay(config: RelayConfig) -> RelayHandle {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RelayHandle { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// A complete `dhBody` order.
#[allow(dead_code)]
pub fn order(security_id: &str) -> serde_json::Value {
    serde_json::json!({
        "securityId": security_id,
        "exchangeSegment": "NSE_EQ",
        "transactionType": "BUY",
        "quantity": 10,
        "productType": "INTRADAY",
        "orderType": "MARKET",
        "validity": "DAY"
    })
}
