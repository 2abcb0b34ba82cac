//! HTTP surface: shared state, router and server loop.
//!
//! Routes (all `GET`, no parameters):
//! - `/api/u`  - Greeter unary call
//! - `/api/ss` - Greeter server streaming
//! - `/api/cs` - Greeter client streaming
//! - `/api/bi` - Greeter bidirectional streaming
//! - `/api/r`  - REST backend, anonymous
//! - `/api/ro` - REST backend, OAuth2 client credentials
//! - `/api/e`  - configured environment string

pub mod handlers;

use crate::adapters::{ClientCredentialsAuthorizer, GreeterConnector, RestBackend};
use crate::config::AppConfig;
use crate::domain::AccessTokenProvider;
use crate::utils::error::Result;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub greeter: GreeterConnector,
    pub rest: RestBackend,
    pub token_provider: Arc<dyn AccessTokenProvider>,
    pub registration_id: String,
    pub env: Arc<str>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rest.timeout_secs))
            .build()?;

        let authorizer = ClientCredentialsAuthorizer::new(
            http_client.clone(),
            config.oauth2.registrations.clone(),
        );

        Ok(Self {
            greeter: GreeterConnector::new(&config.grpc),
            rest: RestBackend::new(http_client, &config.rest),
            token_provider: Arc::new(authorizer),
            registration_id: config.app.oauth2_registration.clone(),
            env: Arc::from(config.app.env.as_str()),
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/u", get(handlers::unary))
        .route("/ss", get(handlers::server_streaming))
        .route("/cs", get(handlers::client_streaming))
        .route("/bi", get(handlers::bidirectional_streaming))
        .route("/r", get(handlers::rest))
        .route("/ro", get(handlers::rest_oauth2))
        .route("/e", get(handlers::env));

    Router::new().nest("/api", api).with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
