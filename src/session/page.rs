//! CDP-backed session
//!
//! One Chrome page target driven through `Runtime.evaluate`.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::cdp::traits::{CdpBrowser, CdpClient, EvaluationResult};
use crate::session::js::{self, FillOutcome};
use crate::session::selector::Selector;
use crate::session::traits::{ElementSnapshot, NavigationResult, Session, Timeouts};
use crate::Error;

/// Target that owns the tab, closed together with the session
#[derive(Debug)]
struct OwnedTarget {
    browser: Arc<dyn CdpBrowser>,
    target_id: String,
}

/// Session over a CDP page target
#[derive(Debug)]
pub struct CdpSession {
    id: String,
    cdp_client: Arc<dyn CdpClient>,
    target: Option<OwnedTarget>,
    timeouts: Timeouts,
    is_active: AtomicBool,
}

impl CdpSession {
    /// Wrap an already connected client. Closing the session only closes the
    /// connection.
    pub fn new(cdp_client: Arc<dyn CdpClient>, timeouts: Timeouts) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            cdp_client,
            target: None,
            timeouts,
            is_active: AtomicBool::new(true),
        }
    }

    /// Wrap a client for a target this session owns; closing the session
    /// closes the target as well.
    pub fn with_target(
        cdp_client: Arc<dyn CdpClient>,
        browser: Arc<dyn CdpBrowser>,
        target_id: String,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            target: Some(OwnedTarget { browser, target_id }),
            ..Self::new(cdp_client, timeouts)
        }
    }

    fn ensure_active(&self) -> Result<(), Error> {
        if self.is_active.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::internal(format!("Session {} is closed", self.id)))
        }
    }

    /// Evaluate a script that returns a JSON string
    async fn evaluate_json(&self, script: &str) -> Result<String, Error> {
        match self.cdp_client.evaluate(script).await? {
            EvaluationResult::String(json) => Ok(json),
            other => Err(Error::script_execution_failed(format!(
                "Expected a JSON string from page script, got {:?}",
                other
            ))),
        }
    }
}

#[async_trait]
impl Session for CdpSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    #[instrument(skip(self), fields(session = %self.id))]
    async fn goto(&self, url: &str) -> Result<NavigationResult, Error> {
        self.ensure_active()?;

        let parsed = reqwest::Url::parse(url).map_err(|e| Error::navigation(format!("{}: invalid URL ({})", url, e)))?;

        let navigation = tokio::time::timeout(self.timeouts.navigation, self.cdp_client.navigate(parsed.as_str())).await;

        let result = match navigation {
            Ok(Ok(result)) => result,
            Ok(Err(Error::Timeout(msg))) => return Err(Error::navigation(format!("{}: {}", url, msg))),
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(Error::navigation(format!(
                    "{}: timeout {}ms exceeded",
                    url,
                    self.timeouts.navigation.as_millis()
                )))
            }
        };

        info!("Loaded {}", result.url);
        Ok(NavigationResult {
            url: result.url,
            status_code: result.status_code,
        })
    }

    async fn current_url(&self) -> Result<String, Error> {
        self.ensure_active()?;

        match self.cdp_client.evaluate("window.location.href").await? {
            EvaluationResult::String(url) => Ok(url),
            other => Err(Error::script_execution_failed(format!("Unexpected location value: {:?}", other))),
        }
    }

    #[instrument(skip(self, selector), fields(session = %self.id, selector = %selector))]
    async fn query(&self, selector: &Selector) -> Result<Vec<ElementSnapshot>, Error> {
        self.ensure_active()?;

        let json = self.evaluate_json(&js::query_script(selector)).await?;
        let elements: Vec<ElementSnapshot> = serde_json::from_str(&json)?;
        debug!("{} element(s) matched", elements.len());
        Ok(elements)
    }

    #[instrument(skip(self, selector, value), fields(session = %self.id, selector = %selector))]
    async fn fill(&self, selector: &Selector, value: &str) -> Result<(), Error> {
        self.ensure_active()?;

        let json = self.evaluate_json(&js::fill_script(selector, value)).await?;
        match serde_json::from_str::<FillOutcome>(&json)? {
            FillOutcome::Ok => Ok(()),
            FillOutcome::NotFound => Err(Error::element_not_found(selector.to_string())),
            FillOutcome::Ambiguous { count } => Err(Error::element_resolution(format!(
                "{} resolved to {} elements",
                selector, count
            ))),
            FillOutcome::NotInteractable { reason } => {
                Err(Error::element_not_interactable(format!("{}: {}", selector, reason)))
            }
        }
    }

    async fn close(&self) -> Result<(), Error> {
        if !self.is_active.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        info!("Closing session {}", self.id);

        if let Err(e) = self.cdp_client.connection().close().await {
            warn!("Failed to close CDP connection for session {}: {}", self.id, e);
        }

        if let Some(target) = &self.target {
            target.browser.close_target(&target.target_id).await?;
        }

        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }
}
