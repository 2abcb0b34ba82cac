use crate::config::RestConfig;
use crate::domain::{AccessTokenProvider, JsonMap};
use crate::utils::error::{GatewayError, Result};
use reqwest::Client;

#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    url: String,
}

impl RestBackend {
    pub fn new(client: Client, config: &RestConfig) -> Self {
        Self {
            client,
            url: format!("{}{}", config.base_url(), config.path),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_anonymous(&self) -> Result<Vec<JsonMap>> {
        tracing::debug!("Making API request to: {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        Self::decode(response).await
    }

    pub async fn fetch_authorized(
        &self,
        provider: &dyn AccessTokenProvider,
        registration_id: &str,
    ) -> Result<Vec<JsonMap>> {
        let token = provider.access_token(registration_id).await?;

        tracing::debug!(
            "Making authorized API request to: {} (registration '{}')",
            self.url,
            registration_id
        );
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(&token.value)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<Vec<JsonMap>> {
        tracing::debug!("API response status: {}", response.status());
        let json_data: serde_json::Value = response.error_for_status()?.json().await?;
        into_maps(json_data)
    }
}

/// An array yields its objects in order; a lone object becomes a one-element list.
pub fn into_maps(json_data: serde_json::Value) -> Result<Vec<JsonMap>> {
    match json_data {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::Object(obj) => Ok(obj),
                other => Err(GatewayError::UnexpectedBody {
                    message: format!("expected a JSON object, got {}", other),
                }),
            })
            .collect(),
        serde_json::Value::Object(obj) => Ok(vec![obj]),
        other => Err(GatewayError::UnexpectedBody {
            message: format!("expected a JSON array or object, got {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccessToken;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use serde_json::json;

    struct StaticToken(&'static str);

    #[async_trait]
    impl AccessTokenProvider for StaticToken {
        async fn access_token(&self, _registration_id: &str) -> Result<AccessToken> {
            Ok(AccessToken {
                value: self.0.to_string(),
                expires_at: None,
            })
        }
    }

    fn backend(server: &MockServer) -> RestBackend {
        let config = RestConfig {
            host: server.host(),
            port: server.port(),
            ..RestConfig::default()
        };
        RestBackend::new(Client::new(), &config)
    }

    #[test]
    fn test_url_uses_scheme_and_path() {
        let config = RestConfig {
            host: "backend".to_string(),
            port: 8443,
            secure: true,
            ..RestConfig::default()
        };
        let backend = RestBackend::new(Client::new(), &config);
        assert_eq!(backend.url(), "https://backend:8443/api/test");
    }

    #[test]
    fn test_into_maps() {
        let maps = into_maps(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[1]["id"], 2);

        let maps = into_maps(json!({"id": 1})).unwrap();
        assert_eq!(maps.len(), 1);

        assert!(into_maps(json!([])).unwrap().is_empty());
        assert!(into_maps(json!("text")).is_err());
        assert!(into_maps(json!([1, 2])).is_err());
    }

    #[tokio::test]
    async fn test_fetch_anonymous() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/api/test");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{"date": "2026-10-16"}, {"date": "2026-10-17"}]));
        });

        let maps = backend(&server).fetch_anonymous().await.unwrap();
        api_mock.assert();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0]["date"], "2026-10-16");
    }

    #[tokio::test]
    async fn test_fetch_authorized_sends_bearer_token() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/test")
                .header("authorization", "Bearer abc");
            then.status(200).json_body(json!({"secured": true}));
        });

        let maps = backend(&server)
            .fetch_authorized(&StaticToken("abc"), "custom")
            .await
            .unwrap();
        api_mock.assert();
        assert_eq!(maps[0]["secured"], true);
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/test");
            then.status(503);
        });

        let err = backend(&server).fetch_anonymous().await.unwrap_err();
        assert!(matches!(err, GatewayError::HttpError(_)));
    }
}
