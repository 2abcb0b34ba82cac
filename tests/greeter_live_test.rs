//! Smoke tests against a running Greeter server.
//!
//! Start a Greeter implementation of proto/helloworld.proto that answers each
//! request with one reply (three for server streaming), then run:
//!
//! ```bash
//! GREETER_HOST=localhost GREETER_PORT=6565 cargo test --test greeter_live_test -- --ignored
//! ```

mod common;

use common::{spawn_app, test_config};
use grpc_example_client::adapters::grpc::REQUESTS_PER_STREAM;
use grpc_example_client::AppConfig;

fn live_config() -> AppConfig {
    let mut config = test_config(1);
    config.grpc.host = std::env::var("GREETER_HOST").unwrap_or_else(|_| "localhost".to_string());
    config.grpc.port = std::env::var("GREETER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(6565);
    config.grpc.secure = std::env::var("GREETER_SECURE").is_ok_and(|v| v == "true");
    config.grpc.stream_timeout_secs = 10;
    config
}

async fn get(base: &str, path: &str) -> (u16, String) {
    let response = reqwest::get(format!("{}{}", base, path)).await.unwrap();
    let status = response.status().as_u16();
    (status, response.text().await.unwrap())
}

#[tokio::test]
#[ignore] // requires a running Greeter server
async fn test_unary_returns_message() {
    let base = spawn_app(&live_config()).await;
    let (status, body) = get(&base, "/api/u").await;

    assert_eq!(status, 200);
    assert!(body.contains("Tom"));
}

#[tokio::test]
#[ignore] // requires a running Greeter server
async fn test_server_streaming_returns_list() {
    let base = spawn_app(&live_config()).await;
    let (status, body) = get(&base, "/api/ss").await;

    assert_eq!(status, 200);
    assert!(body.starts_with('[') && body.ends_with(']'));
    assert!(body.contains("message: "));
}

#[tokio::test]
#[ignore] // requires a running Greeter server
async fn test_client_streaming_returns_single_reply() {
    let base = spawn_app(&live_config()).await;
    let (status, body) = get(&base, "/api/cs").await;

    assert_eq!(status, 200);
    assert_eq!(body.matches("message: ").count(), 1);
}

#[tokio::test]
#[ignore] // requires a running Greeter server
async fn test_bidirectional_streaming_returns_reply_per_request() {
    let base = spawn_app(&live_config()).await;
    let (status, body) = get(&base, "/api/bi").await;

    assert_eq!(status, 200);
    assert_eq!(body.matches("message: ").count(), REQUESTS_PER_STREAM);
}
