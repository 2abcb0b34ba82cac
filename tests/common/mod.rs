#![allow(dead_code)]

use grpc_example_client::proto::helloworld::greeter_server::{Greeter, GreeterServer};
use grpc_example_client::proto::helloworld::{HelloReply, HelloRequest};
use grpc_example_client::{create_router, AppConfig, AppState};
use std::pin::Pin;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_stream::{Stream, StreamExt};
use tonic::{Request, Response, Status, Streaming};

/// Replies sent by `TestGreeter` for one server-streaming call.
pub const SERVER_STREAM_REPLIES: usize = 3;

/// Config pointing at nothing: gRPC on a closed port, REST on `rest_port`.
pub fn test_config(rest_port: u16) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.listen = "127.0.0.1:0".to_string();
    config.grpc.host = "127.0.0.1".to_string();
    config.grpc.port = 1;
    config.grpc.stream_timeout_secs = 2;
    config.grpc.connect_timeout_secs = 1;
    config.rest.host = "127.0.0.1".to_string();
    config.rest.port = rest_port;
    config
}

/// Serves the router on an ephemeral port and returns its base URL.
pub async fn spawn_app(config: &AppConfig) -> String {
    let state = AppState::from_config(config).expect("state builds from config");
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, create_router(state))
            .await
            .expect("server runs");
    });

    format!("http://{}", addr)
}

type ReplyStream = Pin<Box<dyn Stream<Item = Result<HelloReply, Status>> + Send>>;

fn greeting(name: &str) -> HelloReply {
    HelloReply {
        message: format!("Hello {}", name),
    }
}

/// In-process Greeter. With `stall_bidirectional` set, the bidirectional
/// call answers the first request and then keeps the stream open forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestGreeter {
    pub stall_bidirectional: bool,
}

#[async_trait::async_trait]
impl Greeter for TestGreeter {
    async fn say_hello_unary(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<Response<HelloReply>, Status> {
        Ok(Response::new(greeting(&request.into_inner().name)))
    }

    type SayHelloServerStreamingStream = ReplyStream;

    async fn say_hello_server_streaming(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<Response<ReplyStream>, Status> {
        let reply = greeting(&request.into_inner().name);
        let replies = (0..SERVER_STREAM_REPLIES).map(move |_| Ok(reply.clone()));
        Ok(Response::new(Box::pin(tokio_stream::iter(replies))))
    }

    async fn say_hello_client_streaming(
        &self,
        request: Request<Streaming<HelloRequest>>,
    ) -> Result<Response<HelloReply>, Status> {
        let mut inbound = request.into_inner();
        let mut names = Vec::new();
        while let Some(request) = inbound.message().await? {
            names.push(request.name);
        }
        Ok(Response::new(greeting(&names.join(", "))))
    }

    type SayHelloBidirectionalStreamingStream = ReplyStream;

    async fn say_hello_bidirectional_streaming(
        &self,
        request: Request<Streaming<HelloRequest>>,
    ) -> Result<Response<ReplyStream>, Status> {
        let replies = request
            .into_inner()
            .map(|request| request.map(|request| greeting(&request.name)));

        let outbound: ReplyStream = if self.stall_bidirectional {
            Box::pin(replies.take(1).chain(tokio_stream::pending()))
        } else {
            Box::pin(replies)
        };
        Ok(Response::new(outbound))
    }
}

/// Serves `greeter` on an ephemeral port and returns the port.
pub async fn spawn_greeter(greeter: TestGreeter) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();

    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(GreeterServer::new(greeter))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .expect("greeter runs");
    });

    port
}

/// `test_config` with gRPC pointed at a local Greeter on `grpc_port`.
pub fn greeter_config(grpc_port: u16) -> AppConfig {
    let mut config = test_config(1);
    config.grpc.port = grpc_port;
    config
}
