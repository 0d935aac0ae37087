//! Concurrent requests must not see each other's data.

use futures_util::future::join_all;
use serde_json::{json, Value};

mod common;
use common::{MockReply, client, order, relay_config, spawn_relay, start_broker, start_secret_service};

#[tokio::test]
async fn test_concurrent_legacy_requests_are_isolated() {
    let secret = start_secret_service(MockReply::new(200, "tok")).await;
    let broker = start_broker(MockReply::new(200, "{}")).await;
    let relay = spawn_relay(relay_config(
        format!("{}/secret/read", secret.base_url()),
        broker.base_url(),
    ))
    .await;
    let url = relay.url("/relay");
    let client = client();

    let requests = (0..50).map(|i| {
        let client = client.clone();
        let url = url.clone();
        async move {
            let body = json!({
                "symbol": format!("SYM{}", i),
                "segment": "NSE",
                "instrument": "EQ",
                "side": if i % 2 == 0 { "BUY" } else { "SELL" },
                "qty": i
            });
            let res = client.post(&url).json(&body).send().await.unwrap();
            let status = res.status().as_u16();
            (i, body, status, res.json::<Value>().await.unwrap())
        }
    });

    for (i, sent, status, reply) in join_all(requests).await {
        assert_eq!(status, 200, "request {}", i);
        assert_eq!(reply["mode"], "legacy-paper");
        assert_eq!(reply["echo"], sent, "request {} got another request's echo", i);
    }
    assert_eq!(broker.hits(), 0);
}

#[tokio::test]
async fn test_concurrent_live_requests_are_isolated() {
    let secret = start_secret_service(MockReply::new(200, "tok")).await;
    // Broker answers each order with the order itself.
    let broker = start_broker(MockReply::new(200, "").echoing()).await;
    let relay = spawn_relay(relay_config(
        format!("{}/secret/read", secret.base_url()),
        broker.base_url(),
    ))
    .await;
    let url = relay.url("/relay");
    let client = client();

    let requests = (0..25).map(|i| {
        let client = client.clone();
        let url = url.clone();
        async move {
            let dh_body = order(&format!("{}", 1000 + i));
            let res = client
                .post(&url)
                .json(&json!({ "dhBody": dh_body.clone() }))
                .send()
                .await
                .unwrap();
            let status = res.status().as_u16();
            (i, dh_body, status, res.json::<Value>().await.unwrap())
        }
    });

    for (i, sent, status, reply) in join_all(requests).await {
        assert_eq!(status, 200, "request {}", i);
        assert_eq!(reply["ok"], true);
        assert_eq!(reply["upstream"], sent, "request {} got another order back", i);
    }

    // One fresh token per live request.
    assert_eq!(secret.hits(), 25);
    assert_eq!(broker.hits(), 25);
}
