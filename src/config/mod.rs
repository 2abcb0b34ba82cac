pub mod cli;
pub mod toml_config;

pub use cli::Cli;
pub use toml_config::{
    AppConfig, ClientAuthenticationMethod, ClientRegistration, GrpcConfig, RestConfig,
    DEFAULT_REGISTRATION_ID,
};
