pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod proto;
pub mod utils;

pub use adapters::{ClientCredentialsAuthorizer, GreeterConnector, RestBackend};
pub use app::{create_router, AppState};
pub use config::{AppConfig, Cli};
pub use utils::error::{GatewayError, Result};
