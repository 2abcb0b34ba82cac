use crate::app::AppState;
use crate::domain::JsonMap;
use crate::utils::error::Result;
use axum::extract::State;
use axum::Json;

pub async fn unary(State(state): State<AppState>) -> Result<String> {
    tracing::info!("gRPC: Unary");
    let reply = state.greeter.unary().await?;
    Ok(reply.message)
}

pub async fn server_streaming(State(state): State<AppState>) -> Result<String> {
    tracing::info!("gRPC: Server streaming");
    let replies = state.greeter.server_streaming().await?;
    Ok(replies.to_string())
}

pub async fn client_streaming(State(state): State<AppState>) -> String {
    tracing::info!("gRPC: Client streaming");
    state.greeter.client_streaming().await.to_string()
}

pub async fn bidirectional_streaming(State(state): State<AppState>) -> String {
    tracing::info!("gRPC: Bidirectional streaming");
    state.greeter.bidirectional_streaming().await.to_string()
}

pub async fn rest(State(state): State<AppState>) -> Result<Json<Vec<JsonMap>>> {
    tracing::info!("REST: {}", state.rest.url());
    let maps = state.rest.fetch_anonymous().await?;
    Ok(Json(maps))
}

pub async fn rest_oauth2(State(state): State<AppState>) -> Result<Json<Vec<JsonMap>>> {
    tracing::info!("REST(OAuth 2.0): {}", state.rest.url());
    let maps = state
        .rest
        .fetch_authorized(state.token_provider.as_ref(), &state.registration_id)
        .await?;
    Ok(Json(maps))
}

pub async fn env(State(state): State<AppState>) -> String {
    tracing::info!("ENV_STRING: {}", state.env);
    state.env.to_string()
}
