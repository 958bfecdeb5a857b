//! OAuth 2.0 client for the authorization-code flow
//!
//! Handles:
//! - Browser authorization URL building
//! - Authorization code exchange
//! - Token refresh

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, warn};

use super::traits::OAuthClientTrait;
use super::types::{OAuthConfig, TokenResponse, TokenSet};

/// Default timeout for token endpoint calls.
pub const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for OAuth client operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// HTTP request failed
    RequestFailed(reqwest::Error),

    /// Token endpoint answered with a non-success status
    TokenEndpoint { status: u16, body: String },

    /// Failed to parse response
    ParseError(String),

    /// Token response did not state a lifetime
    MissingExpiry,

    /// No refresh token available
    NoRefreshToken,

    /// Invalid configuration
    ConfigError(String),
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::TokenEndpoint { status, body } => {
                write!(f, "token endpoint returned {status}: {body}")
            }
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::MissingExpiry => write!(f, "token response is missing expires_in"),
            Self::NoRefreshToken => write!(f, "no refresh token available"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for OAuthClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RequestFailed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// OAuth 2.0 client bound to one authorization server and redirect target.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
}

impl OAuthClient {
    /// Create a new OAuth client with the given configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(config: OAuthConfig) -> Result<Self, OAuthClientError> {
        let client = Client::builder()
            .timeout(TOKEN_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| OAuthClientError::ConfigError(e.to_string()))?;
        Ok(Self::with_http_client(config, client))
    }

    /// Use a preconfigured reqwest client (shared connection pool, proxies).
    #[must_use]
    pub fn with_http_client(config: OAuthConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Build the browser authorization URL for `state`.
    ///
    /// Pure: the same inputs always produce the same URL.
    ///
    /// # Examples
    /// ```
    /// use uhome_common::auth::{OAuthClient, OAuthConfig};
    ///
    /// let config = OAuthConfig::new(
    ///     "client",
    ///     "http://localhost:8080/",
    ///     "https://oauth.u-tec.com/authorize",
    ///     "https://oauth.u-tec.com/token",
    /// )
    /// .with_scope("openapi");
    /// let client = OAuthClient::new(config).unwrap();
    /// let url = client.authorization_url("xyz");
    /// assert!(url.starts_with("https://oauth.u-tec.com/authorize?response_type=code"));
    /// assert!(url.ends_with("&state=xyz"));
    /// ```
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> String {
        let params = [
            ("response_type", "code"),
            ("client_id", self.config.client_id.as_str()),
            ("scope", self.config.scope.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("state", state),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let base = &self.config.authorization_url;
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}{query_string}")
    }

    /// Exchange an authorization code for tokens
    ///
    /// # Errors
    /// Returns error if the token endpoint rejects the code, the response
    /// cannot be parsed, or it carries no `expires_in`
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, OAuthClientError> {
        let mut request_body = vec![
            ("grant_type", "authorization_code".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("code", code.to_string()),
            ("redirect_uri", self.config.redirect_uri.clone()),
        ];

        if let Some(secret) = &self.config.client_secret {
            request_body.push(("client_secret", secret.clone()));
        }

        self.post_token_form(&request_body, "authorization_code").await
    }

    /// Refresh access token using refresh token
    ///
    /// # Errors
    /// Returns error if no refresh token is provided or the refresh fails
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, OAuthClientError> {
        if refresh_token.is_empty() {
            return Err(OAuthClientError::NoRefreshToken);
        }

        let params = vec![
            ("grant_type", "refresh_token".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("refresh_token", refresh_token.to_string()),
        ];

        self.post_token_form(&params, "refresh_token").await
    }

    async fn post_token_form(
        &self,
        form: &[(&str, String)],
        grant: &'static str,
    ) -> Result<TokenSet, OAuthClientError> {
        debug!(grant, token_url = %self.config.token_url, "requesting tokens");
        let response = self.client.post(&self.config.token_url).form(form).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(grant, %status, "token endpoint rejected request");
            return Err(OAuthClientError::TokenEndpoint { status: status.as_u16(), body });
        }

        let token_response: TokenResponse =
            serde_json::from_str(&body).map_err(|e| OAuthClientError::ParseError(e.to_string()))?;

        let tokens = TokenSet::from_response(token_response, Utc::now())?;
        debug!(grant, expires_at = %tokens.expires_at, "token endpoint issued tokens");
        Ok(tokens)
    }

    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }

    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    fn authorization_url(&self, state: &str) -> String {
        self.authorization_url(state)
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, OAuthClientError> {
        self.exchange_code(code).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, OAuthClientError> {
        self.refresh(refresh_token).await
    }

    fn redirect_uri(&self) -> &str {
        self.redirect_uri()
    }
}
