//! In-memory holder of the current token set
//!
//! The stored value is replaced as a whole; readers never see an access
//! token paired with another token's expiry.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::debug;

use super::types::TokenSet;

/// Tokens are treated as expired this many seconds before their real expiry.
pub const EXPIRY_MARGIN_SECS: i64 = 300;

#[derive(Debug)]
pub struct TokenStore {
    tokens: RwLock<Option<TokenSet>>,
    margin: Duration,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore {
    /// Empty store with the standard five minute safety margin.
    #[must_use]
    pub fn new() -> Self {
        Self::with_margin(Duration::seconds(EXPIRY_MARGIN_SECS))
    }

    #[must_use]
    pub fn with_margin(margin: Duration) -> Self {
        Self { tokens: RwLock::new(None), margin }
    }

    /// Replace the stored tokens.
    pub fn replace(&self, tokens: TokenSet) {
        debug!(expires_at = %tokens.expires_at, "storing token set");
        *self.tokens.write() = Some(tokens);
    }

    pub fn clear(&self) {
        *self.tokens.write() = None;
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<TokenSet> {
        self.tokens.read().clone()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.tokens.read().as_ref().map(|t| t.access_token.clone())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.read().as_ref().and_then(|t| t.refresh_token.clone())
    }

    /// The access token, but only while it is still valid.
    #[must_use]
    pub fn valid_access_token_at(&self, now: DateTime<Utc>) -> Option<String> {
        self.tokens
            .read()
            .as_ref()
            .filter(|t| t.is_valid_at(now, self.margin))
            .map(|t| t.access_token.clone())
    }

    /// `true` iff a token is held and `now < expires_at - margin`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.tokens.read().as_ref().is_some_and(|t| t.is_valid_at(now, self.margin))
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    #[must_use]
    pub fn margin(&self) -> Duration {
        self.margin
    }
}
