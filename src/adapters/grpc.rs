use crate::config::GrpcConfig;
use crate::domain::ReplyList;
use crate::proto::helloworld::greeter_client::GreeterClient;
use crate::proto::helloworld::{HelloReply, HelloRequest};
use crate::utils::error::{GatewayError, Result};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tokio_stream::{Stream, StreamExt};
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::Status;

/// Number of requests written on the client-side stream of the
/// client-streaming and bidirectional calls.
pub const REQUESTS_PER_STREAM: usize = 3;

/// Opens a fresh channel to the Greeter service for every call.
#[derive(Debug, Clone)]
pub struct GreeterConnector {
    uri: String,
    host: String,
    secure: bool,
    name: String,
    stream_timeout: Duration,
    connect_timeout: Duration,
}

impl GreeterConnector {
    pub fn new(config: &GrpcConfig) -> Self {
        let scheme = if config.secure { "https" } else { "http" };
        let authority = if config.host.contains(':') {
            format!("[{}]:{}", config.host, config.port)
        } else {
            format!("{}:{}", config.host, config.port)
        };

        Self {
            uri: format!("{}://{}", scheme, authority),
            host: config.host.clone(),
            secure: config.secure,
            name: config.name.clone(),
            stream_timeout: config.stream_timeout(),
            connect_timeout: config.connect_timeout(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    fn endpoint(&self) -> Result<Endpoint> {
        let endpoint = Endpoint::from_shared(self.uri.clone())?.connect_timeout(self.connect_timeout);

        if self.secure {
            let tls = ClientTlsConfig::new()
                .domain_name(self.host.clone())
                .with_enabled_roots();
            Ok(endpoint.tls_config(tls)?)
        } else {
            Ok(endpoint)
        }
    }

    async fn client(&self) -> Result<GreeterClient<Channel>> {
        tracing::debug!("Connecting to Greeter at {}", self.uri);
        let channel = self.endpoint()?.connect().await?;
        Ok(GreeterClient::new(channel))
    }

    fn request(&self) -> HelloRequest {
        HelloRequest {
            name: self.name.clone(),
        }
    }

    fn outbound(&self) -> impl Stream<Item = HelloRequest> + Send + 'static {
        tokio_stream::iter(vec![self.request(); REQUESTS_PER_STREAM])
    }

    pub async fn unary(&self) -> Result<HelloReply> {
        let mut client = self.client().await?;
        let reply = client.say_hello_unary(self.request()).await?.into_inner();
        Ok(reply)
    }

    /// Drains the server stream to its end. Errors propagate to the caller.
    pub async fn server_streaming(&self) -> Result<ReplyList> {
        let mut client = self.client().await?;
        let mut inbound = client
            .say_hello_server_streaming(self.request())
            .await?
            .into_inner();

        let mut replies = Vec::new();
        while let Some(reply) = inbound.message().await? {
            replies.push(reply);
        }
        Ok(ReplyList(replies))
    }

    /// Failures are logged and yield an empty list.
    pub async fn client_streaming(&self) -> ReplyList {
        let deadline = Instant::now() + self.stream_timeout;

        let call = async {
            let mut client = self.client().await?;
            let reply = client
                .say_hello_client_streaming(self.outbound())
                .await?
                .into_inner();
            Ok::<_, GatewayError>(reply)
        };

        match timeout_at(deadline, call).await {
            Ok(Ok(reply)) => ReplyList(vec![reply]),
            Ok(Err(e)) => {
                tracing::warn!("Client streaming call failed: {}", e);
                ReplyList::default()
            }
            Err(_) => {
                tracing::warn!(
                    "Client streaming call did not complete within {:?}",
                    self.stream_timeout
                );
                ReplyList::default()
            }
        }
    }

    /// Collects replies until the server completes, an error occurs or the
    /// stream timeout elapses. Whatever arrived so far is returned.
    pub async fn bidirectional_streaming(&self) -> ReplyList {
        let deadline = Instant::now() + self.stream_timeout;

        let open = async {
            let mut client = self.client().await?;
            let inbound = client
                .say_hello_bidirectional_streaming(self.outbound())
                .await?
                .into_inner();
            Ok::<_, GatewayError>(inbound)
        };

        match timeout_at(deadline, open).await {
            Ok(Ok(inbound)) => ReplyList(drain_until(inbound, deadline).await),
            Ok(Err(e)) => {
                tracing::warn!("Bidirectional streaming call failed: {}", e);
                ReplyList::default()
            }
            Err(_) => {
                tracing::warn!(
                    "Bidirectional streaming call did not open within {:?}",
                    self.stream_timeout
                );
                ReplyList::default()
            }
        }
    }
}

pub(crate) async fn drain_until<S>(inbound: S, deadline: Instant) -> Vec<HelloReply>
where
    S: Stream<Item = std::result::Result<HelloReply, Status>>,
{
    tokio::pin!(inbound);
    let mut replies = Vec::new();

    loop {
        match timeout_at(deadline, inbound.next()).await {
            Ok(Some(Ok(reply))) => replies.push(reply),
            Ok(Some(Err(status))) => {
                tracing::warn!("Reply stream ended with error: {}", status);
                break;
            }
            Ok(None) => break,
            Err(_) => {
                tracing::warn!(
                    "Reply stream still open at deadline, returning {} replies",
                    replies.len()
                );
                break;
            }
        }
    }

    replies
}
