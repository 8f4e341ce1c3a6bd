use async_trait::async_trait;

use crate::core::errors::CredentialError;

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// A bearer token valid for at least the next request.
    async fn bearer_token(&self) -> Result<String, CredentialError>;
}
