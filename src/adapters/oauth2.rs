//! OAuth2 client-credentials grant.
//!
//! Tokens are fetched from the registration's token endpoint and cached per
//! registration until they come within [`CLOCK_SKEW_SECS`] of expiry.

use crate::config::{ClientAuthenticationMethod, ClientRegistration};
use crate::domain::{AccessToken, AccessTokenProvider};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub const CLOCK_SKEW_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

pub struct ClientCredentialsAuthorizer {
    client: Client,
    registrations: HashMap<String, ClientRegistration>,
    tokens: Mutex<HashMap<String, AccessToken>>,
}

impl ClientCredentialsAuthorizer {
    pub fn new(client: Client, registrations: HashMap<String, ClientRegistration>) -> Self {
        Self {
            client,
            registrations,
            tokens: Mutex::new(HashMap::new()),
        }
    }

    async fn exchange(&self, id: &str, registration: &ClientRegistration) -> Result<AccessToken> {
        tracing::debug!(
            "Requesting client-credentials token for '{}' from {}",
            id,
            registration.token_uri
        );

        let mut form: Vec<(&str, String)> =
            vec![("grant_type", "client_credentials".to_string())];
        if !registration.scopes.is_empty() {
            form.push(("scope", registration.scopes.join(" ")));
        }

        let mut request = self
            .client
            .post(&registration.token_uri)
            .header(reqwest::header::ACCEPT, "application/json");

        match registration.client_authentication_method {
            ClientAuthenticationMethod::ClientSecretBasic => {
                request = request.basic_auth(
                    &registration.client_id,
                    Some(&registration.client_secret),
                );
            }
            ClientAuthenticationMethod::ClientSecretPost => {
                form.push(("client_id", registration.client_id.clone()));
                form.push(("client_secret", registration.client_secret.clone()));
            }
        }

        let response = request.form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::TokenExchange {
                registration: id.to_string(),
                message: format!("token endpoint returned {}: {}", status, body),
            });
        }

        let token: TokenResponse = response.json().await?;
        let value = token.access_token.ok_or_else(|| GatewayError::TokenExchange {
            registration: id.to_string(),
            message: "response did not contain an access_token".to_string(),
        })?;

        Ok(AccessToken {
            value,
            expires_at: token
                .expires_in
                .and_then(Duration::try_seconds)
                .map(|lifetime| Utc::now() + lifetime),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for ClientCredentialsAuthorizer {
    async fn access_token(&self, registration_id: &str) -> Result<AccessToken> {
        let registration = self.registrations.get(registration_id).ok_or_else(|| {
            GatewayError::UnknownRegistration {
                id: registration_id.to_string(),
            }
        })?;

        // Held across the exchange so concurrent callers share one token.
        let mut tokens = self.tokens.lock().await;
        if let Some(token) = tokens.get(registration_id) {
            if !token.is_expired(Utc::now(), Duration::seconds(CLOCK_SKEW_SECS)) {
                return Ok(token.clone());
            }
            tracing::debug!("Cached token for '{}' expired", registration_id);
        }

        let token = self.exchange(registration_id, registration).await?;
        tracing::info!("🔑 Obtained access token for registration '{}'", registration_id);
        tokens.insert(registration_id.to_string(), token.clone());
        Ok(token)
    }
}
