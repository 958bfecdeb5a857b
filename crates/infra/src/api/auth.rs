//! Access token source for the API client

use async_trait::async_trait;
use uhome_domain::Result;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
/// The production implementation is the authentication handler, which runs
/// one login when it holds no valid token.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    async fn access_token(&self) -> Result<String>;
}
