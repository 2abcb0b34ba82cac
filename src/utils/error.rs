use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("gRPC call failed: {0}")]
    GrpcStatus(#[from] tonic::Status),

    #[error("gRPC transport error: {0}")]
    GrpcTransport(#[from] tonic::transport::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unexpected response body: {message}")]
    UnexpectedBody { message: String },

    #[error("Unknown OAuth2 client registration: {id}")]
    UnknownRegistration { id: String },

    #[error("OAuth2 token exchange for '{registration}' failed: {message}")]
    TokenExchange {
        registration: String,
        message: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl GatewayError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            GatewayError::ConfigError { .. } | GatewayError::InvalidConfigValueError { .. }
        )
    }

    /// Every failure that reaches the HTTP layer is reported as a server error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[derive(serde::Serialize)]
struct ErrorBody {
    timestamp: chrono::DateTime<chrono::Utc>,
    status: u16,
    error: &'static str,
    message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!("❌ Request failed: {}", self);

        let body = ErrorBody {
            timestamp: chrono::Utc::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown"),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
