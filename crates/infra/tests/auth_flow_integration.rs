//! Integration tests for the interactive OAuth flow
//!
//! A scripted browser performs the redirect against the real callback
//! listener while wiremock plays the token endpoint.

mod support;

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use support::{free_port, handler_for, init_tracing, token_body, Redirect, ScriptedBrowser};
use uhome_common::auth::{TokenSet, TokenStore};
use uhome_domain::UHomeError;
use uhome_infra::{AccessTokenProvider, CallbackListener};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_token_endpoint(
    server: &MockServer,
    grant: &str,
    body: serde_json::Value,
    calls: u64,
) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(format!("grant_type={grant}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_authenticate_exchanges_redirected_code() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=code-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("access-1", Some("refresh-1"), 3600)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let browser = ScriptedBrowser::new(Redirect::Approve { code: "code-123".into() });
    let handler = handler_for(&server, free_port(), browser.clone());

    let token = handler.authenticate().await.expect("login succeeds");

    assert_eq!(token, "access-1");
    assert_eq!(browser.open_count(), 1);
    assert!(handler.is_valid());
    let state = handler.token_state().expect("tokens stored");
    assert_eq!(state.refresh_token.as_deref(), Some("refresh-1"));
    assert!(state.expires_at > Utc::now() + ChronoDuration::seconds(3500));
}

#[tokio::test]
async fn test_state_mismatch_never_yields_a_token() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "authorization_code", token_body("stolen", None, 3600), 0).await;

    let browser = ScriptedBrowser::new(Redirect::ForgedState { code: "code-123".into() });
    let handler = handler_for(&server, free_port(), browser);

    let err = handler.authenticate().await.unwrap_err();

    assert_eq!(err, UHomeError::Authentication("state mismatch".into()));
    assert!(handler.token_state().is_none());
}

#[tokio::test]
async fn test_timeout_leaves_token_state_unchanged_and_releases_port() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "authorization_code", token_body("late", None, 3600), 0).await;

    let previous = TokenSet::new(
        "old-access".into(),
        Some("old-refresh".into()),
        Utc::now() - ChronoDuration::seconds(10),
        None,
    );
    let store = TokenStore::new();
    store.replace(previous.clone());

    let port = free_port();
    let handler = handler_for(&server, port, ScriptedBrowser::new(Redirect::Ignore))
        .with_callback_timeout(Duration::from_millis(200))
        .with_token_store(store);

    let err = handler.authenticate().await.unwrap_err();

    assert_eq!(err, UHomeError::Authentication("timeout".into()));
    assert_eq!(handler.token_state(), Some(previous));
    assert!(!handler.is_valid());

    let addr = format!("127.0.0.1:{port}").parse().unwrap();
    let rebound = CallbackListener::bind(addr, "/callback").await;
    assert!(rebound.is_ok(), "callback port should be released after a timeout");
}

#[tokio::test]
async fn test_token_endpoint_rejection_carries_body() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let browser = ScriptedBrowser::new(Redirect::Approve { code: "expired".into() });
    let handler = handler_for(&server, free_port(), browser);

    let err = handler.authenticate().await.unwrap_err();

    match err {
        UHomeError::Authentication(msg) => {
            assert!(msg.contains("400"), "{msg}");
            assert!(msg.contains("invalid_grant"), "{msg}");
        }
        other => panic!("expected authentication error, got {other:?}"),
    }
    assert!(handler.token_state().is_none());
}

#[tokio::test]
async fn test_missing_expiry_is_rejected() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_endpoint(
        &server,
        "authorization_code",
        serde_json::json!({"access_token": "no-lifetime", "token_type": "Bearer"}),
        1,
    )
    .await;

    let browser = ScriptedBrowser::new(Redirect::Approve { code: "c".into() });
    let handler = handler_for(&server, free_port(), browser);

    let err = handler.authenticate().await.unwrap_err();
    assert!(err.is_authentication(), "got {err:?}");
    assert!(handler.token_state().is_none());
}

#[tokio::test]
async fn test_opener_failure_still_waits_for_redirect() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "authorization_code", token_body("manual", None, 3600), 1).await;

    let browser = ScriptedBrowser::failing(Redirect::Approve { code: "typed-by-hand".into() });
    let handler = handler_for(&server, free_port(), browser);

    assert_eq!(handler.authenticate().await.unwrap(), "manual");
}

#[tokio::test]
async fn test_refresh_requires_refresh_token() {
    let server = MockServer::start().await;
    let handler = handler_for(&server, free_port(), ScriptedBrowser::new(Redirect::Ignore));

    let err = handler.refresh().await.unwrap_err();
    assert_eq!(err, UHomeError::Authentication("no refresh token available".into()));
}

#[tokio::test]
async fn test_refresh_replaces_tokens_and_keeps_unrotated_refresh_token() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-2", None, 7200)))
        .expect(1)
        .mount(&server)
        .await;

    let store = TokenStore::new();
    store.replace(TokenSet::new(
        "access-1".into(),
        Some("refresh-1".into()),
        Utc::now() + ChronoDuration::seconds(60),
        None,
    ));
    let handler = handler_for(&server, free_port(), ScriptedBrowser::new(Redirect::Ignore))
        .with_token_store(store);
    assert!(!handler.is_valid(), "inside the five minute margin");

    assert_eq!(handler.refresh().await.unwrap(), "access-2");

    let state = handler.token_state().unwrap();
    assert_eq!(state.access_token, "access-2");
    assert_eq!(state.refresh_token.as_deref(), Some("refresh-1"));
    assert!(handler.is_valid());
}

#[tokio::test]
async fn test_validity_boundary_uses_five_minute_margin() {
    let server = MockServer::start().await;
    let expires_at = Utc::now() + ChronoDuration::hours(1);
    let store = TokenStore::new();
    store.replace(TokenSet::new("a".into(), None, expires_at, None));
    let handler = handler_for(&server, free_port(), ScriptedBrowser::new(Redirect::Ignore))
        .with_token_store(store);

    let boundary = expires_at - ChronoDuration::minutes(5);
    assert!(handler.is_valid_at(boundary - ChronoDuration::seconds(1)));
    assert!(!handler.is_valid_at(boundary));

    handler.clear();
    assert!(!handler.is_valid_at(boundary - ChronoDuration::minutes(30)));
}

#[tokio::test]
async fn test_access_token_provider_skips_login_while_valid() {
    let server = MockServer::start().await;
    let store = TokenStore::new();
    store.replace(TokenSet::new("held".into(), None, Utc::now() + ChronoDuration::hours(1), None));

    let browser = ScriptedBrowser::new(Redirect::Ignore);
    let handler = handler_for(&server, free_port(), browser.clone()).with_token_store(store);

    assert_eq!(handler.access_token().await.unwrap(), "held");
    assert_eq!(browser.open_count(), 0);
}

#[tokio::test]
async fn test_access_token_provider_logs_in_when_token_expired() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "authorization_code", token_body("fresh", None, 3600), 1).await;

    let browser = ScriptedBrowser::new(Redirect::Approve { code: "c".into() });
    let handler = handler_for(&server, free_port(), browser.clone());

    assert_eq!(handler.access_token().await.unwrap(), "fresh");
    assert_eq!(browser.open_count(), 1);
}

#[tokio::test]
async fn test_authorization_url_is_deterministic_for_a_given_state() {
    let server = MockServer::start().await;
    let handler = handler_for(&server, 8080, ScriptedBrowser::new(Redirect::Ignore));

    let first = handler.generate_authorization_url(Some("fixed")).unwrap();
    let second = handler.generate_authorization_url(Some("fixed")).unwrap();
    assert_eq!(first, second);

    let pairs: Vec<(String, String)> = first.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("response_type".into(), "code".into())));
    assert!(pairs.contains(&("client_id".into(), "client-abc".into())));
    assert!(pairs.contains(&("scope".into(), "openapi".into())));
    assert!(pairs.contains(&("redirect_uri".into(), "http://127.0.0.1:8080/callback".into())));
    assert!(pairs.contains(&("state".into(), "fixed".into())));

    let generated = handler.generate_authorization_url(None).unwrap();
    let state = generated.query_pairs().find(|(k, _)| k == "state").unwrap().1.into_owned();
    assert_eq!(state.len(), 43, "32 random bytes, URL-safe base64 without padding");
    assert_ne!(generated, first);
}
