//! Client configuration structures
//!
//! Loading (environment, files) lives in `uhome-infra`; these types only
//! carry values and validate them.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ACTION_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_AUTHORIZATION_URL,
    DEFAULT_CALLBACK_TIMEOUT_SECS, DEFAULT_REDIRECT_URI, DEFAULT_SCOPE, DEFAULT_TOKEN_URL,
};
use crate::{Result, UHomeError};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub auth: AuthConfig,
    pub api: ApiConfig,
}

/// OAuth client registration and local callback settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
    pub authorization_url: String,
    pub token_url: String,
    /// Overrides the address derived from `redirect_uri`.
    pub listen_addr: Option<SocketAddr>,
    pub callback_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            authorization_url: DEFAULT_AUTHORIZATION_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            listen_addr: None,
            callback_timeout_secs: DEFAULT_CALLBACK_TIMEOUT_SECS,
        }
    }
}

impl AuthConfig {
    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_secs)
    }
}

/// Action API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub action_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { action_url: DEFAULT_ACTION_URL.to_string(), timeout_secs: DEFAULT_API_TIMEOUT_SECS }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Reject configurations that cannot drive an authentication flow.
    pub fn validate(&self) -> Result<()> {
        if self.auth.client_id.trim().is_empty() {
            return Err(UHomeError::Config("client_id is required".into()));
        }
        for (name, value) in [
            ("redirect_uri", &self.auth.redirect_uri),
            ("authorization_url", &self.auth.authorization_url),
            ("token_url", &self.auth.token_url),
            ("action_url", &self.api.action_url),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(UHomeError::Config(format!("{name} must be an http(s) URL: {value}")));
            }
        }
        if self.auth.callback_timeout_secs == 0 {
            return Err(UHomeError::Config("callback_timeout_secs must be positive".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(UHomeError::Config("api timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
