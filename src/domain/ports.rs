use crate::domain::model::AccessToken;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Supplies bearer tokens for a named OAuth2 client registration.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self, registration_id: &str) -> Result<AccessToken>;
}
