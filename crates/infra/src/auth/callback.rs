//! Loopback HTTP listener that captures the OAuth redirect.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use uhome_domain::{Result, UHomeError};
use url::Url;

const ACKNOWLEDGEMENT: &str = "Authorization received. You can close this window.";

type CallbackSlot = Arc<Mutex<Option<oneshot::Sender<CallbackParams>>>>;

/// Query parameters carried by the redirect. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Resolve the socket address and route path a redirect URI points at.
///
/// `localhost` binds the IPv4 loopback. `listen_addr`, when given, replaces
/// the host and port but the path still comes from the URI.
pub fn redirect_binding(
    redirect_uri: &str,
    listen_addr: Option<SocketAddr>,
) -> Result<(SocketAddr, String)> {
    let url = Url::parse(redirect_uri).map_err(|err| {
        UHomeError::Config(format!("invalid redirect URI '{redirect_uri}': {err}"))
    })?;

    let path = match url.path() {
        "" => "/".to_string(),
        path => path.to_string(),
    };

    if let Some(addr) = listen_addr {
        return Ok((addr, path));
    }

    let port = url
        .port_or_known_default()
        .ok_or_else(|| UHomeError::Config(format!("redirect URI has no port: {redirect_uri}")))?;

    let ip = match url.host_str() {
        Some("localhost") | None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        Some(host) => host.trim_start_matches('[').trim_end_matches(']').parse().map_err(|_| {
            UHomeError::Config(format!("redirect host '{host}' is not a local address"))
        })?,
    };

    Ok((SocketAddr::new(ip, port), path))
}

/// One-shot redirect receiver.
///
/// The server is fully bound when [`CallbackListener::bind`] returns. The
/// first GET to the route fills the one-shot; later requests are acknowledged
/// and ignored. Dropping the listener aborts the server task.
pub struct CallbackListener {
    local_addr: SocketAddr,
    receiver: Option<oneshot::Receiver<CallbackParams>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CallbackListener {
    pub async fn bind(addr: SocketAddr, path: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|err| {
            UHomeError::Network(format!("failed to bind OAuth callback listener on {addr}: {err}"))
        })?;

        let local_addr = listener.local_addr().map_err(|err| {
            UHomeError::Network(format!("failed to determine callback address: {err}"))
        })?;

        let (callback_tx, callback_rx) = oneshot::channel();
        let slot: CallbackSlot = Arc::new(Mutex::new(Some(callback_tx)));

        let app = Router::new().route(path, get(handle_callback)).with_state(slot);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                error!("OAuth callback listener error: {}", err);
            }
        });

        debug!(%local_addr, path, "OAuth callback listener bound");

        Ok(Self {
            local_addr,
            receiver: Some(callback_rx),
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the redirect, giving up after `timeout`.
    pub async fn wait(&mut self, timeout: Duration) -> Result<CallbackParams> {
        let receiver = self
            .receiver
            .take()
            .ok_or_else(|| UHomeError::Internal("callback already awaited".into()))?;

        match tokio::time::timeout(timeout, receiver).await {
            Ok(Ok(params)) => Ok(params),
            Ok(Err(_)) => Err(UHomeError::Authentication(
                "callback listener stopped before a redirect arrived".into(),
            )),
            Err(_) => Err(UHomeError::Authentication("timeout".into())),
        }
    }

    /// Stop the server gracefully and wait for the port to be released.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    return Err(UHomeError::Internal(format!(
                        "OAuth callback listener panicked: {err}"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Drop for CallbackListener {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                handle.abort();
            }
        }
    }
}

async fn handle_callback(
    State(slot): State<CallbackSlot>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, &'static str) {
    if let Some(tx) = slot.lock().take() {
        debug!(
            has_code = params.code.is_some(),
            has_state = params.state.is_some(),
            "redirect captured"
        );
        let _ = tx.send(params);
    }
    (StatusCode::OK, ACKNOWLEDGEMENT)
}
