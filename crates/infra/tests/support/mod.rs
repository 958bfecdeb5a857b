//! Shared helpers for `uhome-infra` integration tests.

#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use uhome_common::auth::{OAuthClient, OAuthConfig};
use uhome_domain::{Result, UHomeError};
use uhome_infra::{AccessTokenProvider, AuthenticationHandler, UriOpener};
use url::Url;
use wiremock::MockServer;

static TRACING: Once = Once::new();

/// Route test logs through the libtest capture.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("uhome_infra=debug")
            .with_test_writer()
            .try_init();
    });
}

/// A loopback port that was free a moment ago.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

pub fn http() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().expect("reqwest client")
}

/// How the scripted browser answers the authorization page.
#[derive(Debug, Clone)]
pub enum Redirect {
    /// Redirect back with `code` and the state from the authorization URL.
    Approve { code: String },
    /// Redirect back with `code` and a different state.
    ForgedState { code: String },
    /// Never redirect.
    Ignore,
}

/// `UriOpener` that plays the user's browser: it reads `redirect_uri` and
/// `state` from the authorization URL and performs the redirect.
pub struct ScriptedBrowser {
    redirect: Redirect,
    fail_to_open: bool,
    opened: AtomicUsize,
}

impl ScriptedBrowser {
    pub fn new(redirect: Redirect) -> Arc<Self> {
        Arc::new(Self { redirect, fail_to_open: false, opened: AtomicUsize::new(0) })
    }

    /// Performs the redirect but reports that no browser could be launched.
    pub fn failing(redirect: Redirect) -> Arc<Self> {
        Arc::new(Self { redirect, fail_to_open: true, opened: AtomicUsize::new(0) })
    }

    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UriOpener for ScriptedBrowser {
    async fn open(&self, url: &Url) -> Result<()> {
        self.opened.fetch_add(1, Ordering::SeqCst);

        let query = |key: &str| {
            url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
        };
        let redirect_uri = query("redirect_uri").expect("redirect_uri in authorization URL");
        let state = query("state").expect("state in authorization URL");

        let target = match &self.redirect {
            Redirect::Approve { code } => Some((code.clone(), state)),
            Redirect::ForgedState { code } => Some((code.clone(), "forged-state".to_string())),
            Redirect::Ignore => None,
        };

        if let Some((code, state)) = target {
            let mut callback = Url::parse(&redirect_uri).expect("redirect uri");
            callback.query_pairs_mut().append_pair("code", &code).append_pair("state", &state);
            // The browser follows the redirect after the opener returns.
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                let _ = http().get(callback).send().await;
            });
        }

        if self.fail_to_open {
            return Err(UHomeError::Internal("no browser available".into()));
        }
        Ok(())
    }
}

/// Token endpoint JSON body.
pub fn token_body(access: &str, refresh: Option<&str>, expires_in: i64) -> Value {
    let mut body = json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": expires_in
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = json!(refresh);
    }
    body
}

/// Handler wired to a wiremock authorization server and a loopback
/// redirect on `port`.
pub fn handler_for(
    server: &MockServer,
    port: u16,
    opener: Arc<dyn UriOpener>,
) -> AuthenticationHandler {
    let config = OAuthConfig::new(
        "client-abc",
        format!("http://127.0.0.1:{port}/callback"),
        format!("{}/authorize", server.uri()),
        format!("{}/token", server.uri()),
    )
    .with_scope("openapi");
    let oauth = OAuthClient::new(config).expect("oauth client");

    AuthenticationHandler::new(Arc::new(oauth), opener)
        .with_callback_timeout(Duration::from_secs(2))
}

/// Provider returning a fixed bearer token.
pub struct FixedToken(pub &'static str);

#[async_trait]
impl AccessTokenProvider for FixedToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}
