//! Session launcher
//!
//! Opens a fresh browser tab per test against a running Chrome.

use std::sync::Arc;
use tracing::info;

use crate::cdp::browser::CdpBrowserImpl;
use crate::cdp::traits::CdpBrowser;
use crate::config::Config;
use crate::session::page::CdpSession;
use crate::session::traits::{Session, Timeouts};
use crate::Error;

/// Creates [`CdpSession`]s, one page target each
#[derive(Debug, Clone)]
pub struct SessionLauncher {
    browser: Arc<dyn CdpBrowser>,
    timeouts: Timeouts,
}

impl SessionLauncher {
    /// Launcher for the Chrome at `config.cdp_endpoint`
    pub fn new(config: &Config) -> Self {
        Self::with_browser(
            Arc::new(CdpBrowserImpl::new(config.cdp_endpoint.clone())),
            config.timeouts(),
        )
    }

    /// Launcher over an arbitrary browser endpoint
    pub fn with_browser(browser: Arc<dyn CdpBrowser>, timeouts: Timeouts) -> Self {
        Self { browser, timeouts }
    }

    /// Open a blank tab and return its session handle
    pub async fn launch(&self) -> Result<Arc<dyn Session>, Error> {
        let (target_id, ws_url) = self.browser.create_target("about:blank").await?;

        let client = match self.browser.create_client(&ws_url, self.timeouts.navigation).await {
            Ok(client) => client,
            Err(e) => {
                // Don't leak the tab when the WebSocket handshake fails
                let _ = self.browser.close_target(&target_id).await;
                return Err(e);
            }
        };

        let session = CdpSession::with_target(client, Arc::clone(&self.browser), target_id, self.timeouts);
        info!("Launched session {}", session.id());
        Ok(Arc::new(session))
    }
}
