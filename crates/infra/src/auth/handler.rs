//! OAuth authorization-code orchestration
//!
//! Per attempt the handler moves through
//! `awaiting_redirect -> (code_received | timed_out | state_mismatch) ->
//! exchanging -> (authenticated | failed)`, reporting each phase as a
//! `phase` field on its log events. The callback listener is stopped on
//! every terminal path.
//!
//! Concurrent calls to [`AuthenticationHandler::authenticate`] are not
//! serialized here; two attempts race for the same callback port and one of
//! them fails to bind.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};
use uhome_common::auth::{
    generate_state, validate_state, OAuthClient, OAuthClientTrait, OAuthConfig, TokenSet,
    TokenStore,
};
use uhome_domain::constants::DEFAULT_CALLBACK_TIMEOUT_SECS;
use uhome_domain::{AuthConfig, Result, UHomeError};
use url::Url;

use super::callback::{redirect_binding, CallbackListener, CallbackParams};
use super::opener::{SystemBrowser, UriOpener};
use crate::api::AccessTokenProvider;
use crate::errors::InfraError;

/// Owns the token state and runs the interactive login.
pub struct AuthenticationHandler {
    oauth: Arc<dyn OAuthClientTrait>,
    opener: Arc<dyn UriOpener>,
    tokens: TokenStore,
    listen_addr: Option<SocketAddr>,
    callback_timeout: Duration,
}

impl AuthenticationHandler {
    pub fn new(oauth: Arc<dyn OAuthClientTrait>, opener: Arc<dyn UriOpener>) -> Self {
        Self {
            oauth,
            opener,
            tokens: TokenStore::new(),
            listen_addr: None,
            callback_timeout: Duration::from_secs(DEFAULT_CALLBACK_TIMEOUT_SECS),
        }
    }

    /// Build a handler talking to the configured vendor endpoints and
    /// presenting the login page in the system browser.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let oauth_config = OAuthConfig::new(
            config.client_id.clone(),
            config.redirect_uri.clone(),
            config.authorization_url.clone(),
            config.token_url.clone(),
        )
        .with_client_secret(config.client_secret.clone())
        .with_scope(config.scope.clone());

        let oauth = OAuthClient::new(oauth_config).map_err(InfraError::from)?;

        let mut handler = Self::new(Arc::new(oauth), Arc::new(SystemBrowser))
            .with_callback_timeout(config.callback_timeout());
        handler.listen_addr = config.listen_addr;
        Ok(handler)
    }

    #[must_use]
    pub fn with_callback_timeout(mut self, timeout: Duration) -> Self {
        self.callback_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = Some(addr);
        self
    }

    #[must_use]
    pub fn with_token_store(mut self, tokens: TokenStore) -> Self {
        self.tokens = tokens;
        self
    }

    /// Authorization URL for `state`, or for a freshly generated state.
    pub fn generate_authorization_url(&self, state: Option<&str>) -> Result<Url> {
        let state = state.map_or_else(generate_state, str::to_string);
        let raw = self.oauth.authorization_url(&state);
        Url::parse(&raw)
            .map_err(|err| UHomeError::Config(format!("invalid authorization URL '{raw}': {err}")))
    }

    /// Run the interactive login and store the resulting tokens.
    ///
    /// On failure the previously held tokens are left untouched.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> Result<String> {
        match self.run_login().await {
            Ok(tokens) => {
                info!(phase = "authenticated", expires_at = %tokens.expires_at, "login complete");
                let access_token = tokens.access_token.clone();
                self.tokens.replace(tokens);
                Ok(access_token)
            }
            Err(err) => {
                warn!(phase = "failed", error = %err, "login failed");
                Err(err)
            }
        }
    }

    async fn run_login(&self) -> Result<TokenSet> {
        let state = generate_state();
        let url = self.generate_authorization_url(Some(&state))?;

        let (addr, path) = redirect_binding(self.oauth.redirect_uri(), self.listen_addr)?;
        let mut listener = CallbackListener::bind(addr, &path).await?;
        info!(
            phase = "awaiting_redirect",
            addr = %listener.local_addr(),
            timeout_secs = self.callback_timeout.as_secs(),
            "waiting for authorization redirect"
        );

        if let Err(err) = self.opener.open(&url).await {
            warn!(error = %err, url = %url, "could not open a browser; visit the URL manually");
        }

        let outcome = listener.wait(self.callback_timeout).await;
        if let Err(err) = listener.shutdown().await {
            debug!(error = %err, "callback listener did not stop cleanly");
        }

        let params = outcome.inspect_err(|err| {
            warn!(
                phase = redirect_failure_phase(err),
                error = %err,
                "no authorization redirect received"
            );
        })?;
        let code = verify_callback(&state, params)?;

        info!(phase = "exchanging", "exchanging authorization code");
        self.oauth.exchange_code(&code).await.map_err(|err| UHomeError::from(InfraError::from(err)))
    }

    /// Exchange the held refresh token for a new token set.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<String> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .ok_or_else(|| UHomeError::Authentication("no refresh token available".into()))?;

        let mut tokens = self
            .oauth
            .refresh(&refresh_token)
            .await
            .map_err(|err| UHomeError::from(InfraError::from(err)))?;
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token);
        }

        info!(expires_at = %tokens.expires_at, "access token refreshed");
        let access_token = tokens.access_token.clone();
        self.tokens.replace(tokens);
        Ok(access_token)
    }

    pub fn is_valid(&self) -> bool {
        self.tokens.is_valid()
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.tokens.is_valid_at(now)
    }

    /// Snapshot of the held tokens.
    pub fn token_state(&self) -> Option<TokenSet> {
        self.tokens.snapshot()
    }

    /// Forget the held tokens.
    pub fn clear(&self) {
        self.tokens.clear();
        info!("token state cleared");
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }
}

#[async_trait]
impl AccessTokenProvider for AuthenticationHandler {
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.tokens.valid_access_token_at(Utc::now()) {
            return Ok(token);
        }
        debug!("no valid access token held; starting login");
        self.authenticate().await
    }
}

/// Log phase for a failed wait on the callback listener.
fn redirect_failure_phase(err: &UHomeError) -> &'static str {
    match err {
        UHomeError::Authentication(msg) if msg == "timeout" => "timed_out",
        UHomeError::Authentication(_) => "listener_stopped",
        _ => "listener_failed",
    }
}

fn verify_callback(expected_state: &str, params: CallbackParams) -> Result<String> {
    let state_matches =
        params.state.as_deref().is_some_and(|state| validate_state(expected_state, state));
    if !state_matches {
        warn!(phase = "state_mismatch", "redirect state does not match");
        return Err(UHomeError::Authentication("state mismatch".into()));
    }

    match params.code.filter(|code| !code.is_empty()) {
        Some(code) => {
            info!(phase = "code_received", "authorization code received");
            Ok(code)
        }
        None => Err(UHomeError::Authentication("redirect carried no authorization code".into())),
    }
}
