// Adapters layer: concrete clients for the external systems (gRPC, REST, OAuth2).

pub mod grpc;
pub mod oauth2;
pub mod rest;

pub use grpc::GreeterConnector;
pub use oauth2::ClientCredentialsAuthorizer;
pub use rest::RestBackend;
