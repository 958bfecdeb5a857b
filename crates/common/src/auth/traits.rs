//! Traits for OAuth operations
//!
//! Abstracts the token endpoint so the authentication flow can be driven
//! against a mock in tests.

use async_trait::async_trait;

use super::client::OAuthClientError;
use super::types::TokenSet;

/// Trait for OAuth client operations
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Build the browser authorization URL carrying `state`.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for tokens
    ///
    /// # Errors
    /// Returns error if the exchange fails or the response cannot be parsed
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, OAuthClientError>;

    /// Refresh access token using refresh token
    ///
    /// # Errors
    /// Returns error if refresh fails or token is invalid/revoked
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, OAuthClientError>;

    /// Get the configured redirect URI
    fn redirect_uri(&self) -> &str;
}
