//! Remote-debugging HTTP endpoint
//!
//! Opens and closes page targets through Chrome's `/json` API and connects
//! WebSocket clients to them.

use super::client::CdpClientImpl;
use super::connection::CdpWebSocketConnection;
use super::traits::*;
use crate::Error;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Entry returned by `/json/new`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetInfo {
    id: String,
    web_socket_debugger_url: String,
}

/// [`CdpBrowser`] for a Chrome started with `--remote-debugging-port`
#[derive(Debug, Clone)]
pub struct CdpBrowserImpl {
    /// e.g. "ws://localhost:9222"
    endpoint: String,
    http: reqwest::Client,
}

impl CdpBrowserImpl {
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `path` on the HTTP form of the endpoint
    fn http_url(&self, path: &str) -> Result<Url, Error> {
        let base = self
            .endpoint
            .replacen("ws://", "http://", 1)
            .replacen("wss://", "https://", 1);
        Url::parse(&base)
            .and_then(|base| base.join(path))
            .map_err(|e| Error::configuration(format!("Invalid CDP endpoint {}: {}", self.endpoint, e)))
    }

    fn unreachable(&self, e: reqwest::Error) -> Error {
        Error::cdp(format!(
            "Failed to reach Chrome at {} (start it with --remote-debugging-port): {}",
            self.endpoint, e
        ))
    }
}

#[async_trait]
impl CdpBrowser for CdpBrowserImpl {
    async fn create_client(&self, target_url: &str, load_timeout: Duration) -> Result<Arc<dyn CdpClient>, Error> {
        let connection = CdpWebSocketConnection::new(target_url).await?;
        let client = Arc::new(CdpClientImpl::new(connection.clone()).with_load_timeout(load_timeout));

        for domain in ["Page", "Runtime"] {
            if let Err(e) = client.enable_domain(domain).await {
                if let Err(close_err) = connection.close().await {
                    debug!("Closing {} after failed {}.enable: {}", target_url, domain, close_err);
                }
                return Err(e);
            }
        }

        Ok(client)
    }

    async fn create_target(&self, url: &str) -> Result<(String, String), Error> {
        let mut new_url = self.http_url("/json/new")?;
        new_url.set_query(Some(url));

        let target: TargetInfo = self
            .http
            .put(new_url)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?
            .error_for_status()
            .map_err(|e| Error::cdp(format!("Chrome refused to open a target: {}", e)))?
            .json()
            .await
            .map_err(|e| Error::cdp(format!("Unexpected /json/new response: {}", e)))?;

        info!("Opened target {}", target.id);
        debug!("Target {} debugger URL {}", target.id, target.web_socket_debugger_url);
        Ok((target.id, target.web_socket_debugger_url))
    }

    async fn close_target(&self, target_id: &str) -> Result<(), Error> {
        let url = self.http_url(&format!("/json/close/{}", target_id))?;

        self.http
            .get(url)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?
            .error_for_status()
            .map_err(|e| Error::cdp(format!("Failed to close target {}: {}", target_id, e)))?;

        info!("Closed target {}", target_id);
        Ok(())
    }
}
