//! OAuth 2.0 types and structures

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::client::OAuthClientError;

/// Access and refresh tokens with their absolute expiry.
///
/// `expires_at` is mandatory: a token without a known lifetime is never
/// stored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,

    /// Optional because the vendor does not always rotate refresh tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    pub token_type: String,

    /// Absolute expiration timestamp (UTC)
    pub expires_at: DateTime<Utc>,

    /// Granted scopes (space-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenSet {
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        expires_at: DateTime<Utc>,
        scope: Option<String>,
    ) -> Self {
        Self { access_token, refresh_token, token_type: "Bearer".to_string(), expires_at, scope }
    }

    /// Build a token set from a token endpoint response received at `now`.
    ///
    /// # Errors
    /// Fails when `expires_in` is absent or negative rather than guessing a
    /// lifetime.
    pub fn from_response(
        response: TokenResponse,
        now: DateTime<Utc>,
    ) -> Result<Self, OAuthClientError> {
        let expires_in = response.expires_in.ok_or(OAuthClientError::MissingExpiry)?;
        if expires_in < 0 {
            return Err(OAuthClientError::ParseError(format!(
                "negative expires_in in token response: {expires_in}"
            )));
        }
        if response.access_token.is_empty() {
            return Err(OAuthClientError::ParseError("empty access_token".to_string()));
        }

        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                OAuthClientError::ParseError(format!(
                    "expires_in out of range in token response: {expires_in}"
                ))
            })?;

        Ok(Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.filter(|token| !token.is_empty()),
            token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_at,
            scope: response.scope,
        })
    }

    /// `true` iff `now` is strictly before `expires_at - margin`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now < self.expires_at - margin
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Token endpoint response (RFC 6749 section 5.1)
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// OAuth client registration for the authorization-code flow
#[derive(Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
    pub authorization_url: String,
    pub token_url: String,
}

impl OAuthConfig {
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        authorization_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: redirect_uri.into(),
            scope: String::new(),
            authorization_url: authorization_url.into(),
            token_url: token_url.into(),
        }
    }

    #[must_use]
    pub fn with_client_secret(mut self, secret: Option<String>) -> Self {
        self.client_secret = secret.filter(|s| !s.is_empty());
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("authorization_url", &self.authorization_url)
            .field("token_url", &self.token_url)
            .finish()
    }
}
