//! Presenting the authorization URL to the user

use async_trait::async_trait;
use tracing::debug;
use uhome_domain::{Result, UHomeError};
use url::Url;

/// Collaborator that shows the authorization URL to the user.
///
/// The default implementation launches the system browser; tests substitute
/// an opener that performs the redirect itself.
#[async_trait]
pub trait UriOpener: Send + Sync {
    async fn open(&self, url: &Url) -> Result<()>;
}

/// Opens URLs with the platform's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

#[async_trait]
impl UriOpener for SystemBrowser {
    async fn open(&self, url: &Url) -> Result<()> {
        let target = url.to_string();
        debug!("launching system browser");
        tokio::task::spawn_blocking(move || open::that(target))
            .await
            .map_err(|err| UHomeError::Internal(format!("browser launch task failed: {err}")))?
            .map_err(|err| UHomeError::Internal(format!("failed to open browser: {err}")))
    }
}
