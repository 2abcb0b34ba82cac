use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_REGISTRATION_ID: &str = "custom";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub grpc: GrpcConfig,
    pub rest: RestConfig,
    pub app: AppSection,
    pub oauth2: OAuth2Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrpcConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    /// Name sent in every `HelloRequest`.
    pub name: String,
    pub stream_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6565,
            secure: false,
            name: "Tom".to_string(),
            stream_timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

impl GrpcConfig {
    pub fn stream_timeout(&self) -> Duration {
        Duration::from_secs(self.stream_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub path: String,
    pub timeout_secs: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8081,
            secure: false,
            path: "/api/test".to_string(),
            timeout_secs: 30,
        }
    }
}

impl RestConfig {
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    /// Echoed verbatim by `/api/e`.
    pub env: String,
    pub oauth2_registration: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            env: String::new(),
            oauth2_registration: DEFAULT_REGISTRATION_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuth2Config {
    pub registrations: HashMap<String, ClientRegistration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRegistration {
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub client_authentication_method: ClientAuthenticationMethod,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthenticationMethod {
    #[default]
    ClientSecretBasic,
    ClientSecretPost,
}

impl AppConfig {
    /// Reads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GatewayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists, otherwise falls back to built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("Loading configuration from {}", path.display());
            Self::from_file(path)
        } else {
            tracing::warn!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Parses configuration from TOML text after placeholder substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GatewayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` placeholders with environment values; unknown variables stay verbatim.
    fn substitute_env_vars(content: &str) -> String {
        static PLACEHOLDER: OnceLock<regex::Regex> = OnceLock::new();
        let re = PLACEHOLDER.get_or_init(|| {
            regex::Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        validation::validate_socket_addr("server.listen", &self.server.listen)
    }

    /// The registration used by the OAuth2-protected REST endpoint, if configured.
    pub fn active_registration(&self) -> Option<&ClientRegistration> {
        self.oauth2.registrations.get(&self.app.oauth2_registration)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.listen_addr()?;

        validation::validate_host("grpc.host", &self.grpc.host)?;
        validation::validate_port("grpc.port", self.grpc.port)?;
        validation::validate_non_empty_string("grpc.name", &self.grpc.name)?;
        validation::validate_range(
            "grpc.stream_timeout_secs",
            self.grpc.stream_timeout_secs,
            1,
            300,
        )?;
        validation::validate_range(
            "grpc.connect_timeout_secs",
            self.grpc.connect_timeout_secs,
            1,
            300,
        )?;

        validation::validate_host("rest.host", &self.rest.host)?;
        validation::validate_port("rest.port", self.rest.port)?;
        if !self.rest.path.starts_with('/') {
            return Err(GatewayError::InvalidConfigValueError {
                field: "rest.path".to_string(),
                value: self.rest.path.clone(),
                reason: "Path must start with '/'".to_string(),
            });
        }
        validation::validate_url("rest", &self.rest.base_url())?;

        for (id, registration) in &self.oauth2.registrations {
            let field = format!("oauth2.registrations.{}", id);
            validation::validate_url(&format!("{}.token_uri", field), &registration.token_uri)?;
            validation::validate_non_empty_string(
                &format!("{}.client_id", field),
                &registration.client_id,
            )?;
        }

        if !self.oauth2.registrations.is_empty() && self.active_registration().is_none() {
            return Err(GatewayError::InvalidConfigValueError {
                field: "app.oauth2_registration".to_string(),
                value: self.app.oauth2_registration.clone(),
                reason: "No client registration with this id".to_string(),
            });
        }

        Ok(())
    }
}
