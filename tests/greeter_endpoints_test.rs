mod common;

use common::{greeter_config, spawn_app, spawn_greeter, TestGreeter, SERVER_STREAM_REPLIES};
use grpc_example_client::adapters::grpc::REQUESTS_PER_STREAM;
use std::time::{Duration, Instant};

async fn get(base: &str, path: &str) -> (u16, String) {
    let response = reqwest::get(format!("{}{}", base, path)).await.unwrap();
    let status = response.status().as_u16();
    (status, response.text().await.unwrap())
}

#[tokio::test]
async fn test_unary_endpoint_returns_greeting() {
    let port = spawn_greeter(TestGreeter::default()).await;
    let base = spawn_app(&greeter_config(port)).await;

    let (status, body) = get(&base, "/api/u").await;

    assert_eq!(status, 200);
    assert_eq!(body, "Hello Tom");
}

#[tokio::test]
async fn test_server_streaming_endpoint_lists_every_reply() {
    let port = spawn_greeter(TestGreeter::default()).await;
    let base = spawn_app(&greeter_config(port)).await;

    let (status, body) = get(&base, "/api/ss").await;

    assert_eq!(status, 200);
    assert_eq!(body.matches("message: \"Hello Tom\"\n").count(), SERVER_STREAM_REPLIES);
    assert!(body.starts_with("[message: ") && body.ends_with("\n]"));
}

#[tokio::test]
async fn test_client_streaming_endpoint_returns_single_reply() {
    let port = spawn_greeter(TestGreeter::default()).await;
    let base = spawn_app(&greeter_config(port)).await;

    let (status, body) = get(&base, "/api/cs").await;

    assert_eq!(status, 200);
    // the server saw all three requests before answering once
    assert_eq!(body, "[message: \"Hello Tom, Tom, Tom\"\n]");
}

#[tokio::test]
async fn test_bidirectional_endpoint_returns_reply_per_request() {
    let port = spawn_greeter(TestGreeter::default()).await;
    let base = spawn_app(&greeter_config(port)).await;

    let (status, body) = get(&base, "/api/bi").await;

    assert_eq!(status, 200);
    assert_eq!(body.matches("message: \"Hello Tom\"\n").count(), REQUESTS_PER_STREAM);
}

#[tokio::test]
async fn test_bidirectional_endpoint_returns_partial_list_at_deadline() {
    let port = spawn_greeter(TestGreeter {
        stall_bidirectional: true,
    })
    .await;
    let mut config = greeter_config(port);
    config.grpc.stream_timeout_secs = 1;
    let base = spawn_app(&config).await;

    let started = Instant::now();
    let (status, body) = get(&base, "/api/bi").await;
    let elapsed = started.elapsed();

    assert_eq!(status, 200);
    assert_eq!(body, "[message: \"Hello Tom\"\n]");
    assert!(elapsed >= Duration::from_millis(900), "returned after {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(5), "returned after {:?}", elapsed);
}

#[tokio::test]
async fn test_greeting_name_comes_from_config() {
    let port = spawn_greeter(TestGreeter::default()).await;
    let mut config = greeter_config(port);
    config.grpc.name = "Tomás".to_string();
    let base = spawn_app(&config).await;

    let (_, unary) = get(&base, "/api/u").await;
    let (_, streamed) = get(&base, "/api/bi").await;

    assert_eq!(unary, "Hello Tomás");
    assert!(streamed.starts_with("[message: \"Hello Tom\\303\\241s\"\n"));
}
