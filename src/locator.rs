//! Locators
//!
//! A [`Locator`] is a query descriptor bound to a session. It holds no DOM
//! node: every call resolves the selector against the page as it is now.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::session::{ElementSnapshot, Selector, Session};
use crate::{Error, Result};

/// Lazily-resolved element query
#[derive(Clone)]
pub struct Locator {
    session: Arc<dyn Session>,
    selector: Selector,
}

impl Locator {
    pub fn new(session: Arc<dyn Session>, selector: impl Into<Selector>) -> Self {
        Self {
            session,
            selector: selector.into(),
        }
    }

    /// Query descriptor this locator resolves
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Session the locator is bound to
    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    /// Snapshot of every matching element, without waiting
    pub async fn all(&self) -> Result<Vec<ElementSnapshot>> {
        self.session.query(&self.selector).await
    }

    /// Number of matching elements, without waiting
    pub async fn count(&self) -> Result<usize> {
        Ok(self.all().await?.len())
    }

    /// Whether the single matching element is visible, without waiting.
    /// `false` when nothing matches.
    pub async fn is_visible(&self) -> Result<bool> {
        match self.all().await?.as_slice() {
            [] => Ok(false),
            [element] => Ok(element.visible),
            many => Err(self.ambiguous(many.len())),
        }
    }

    /// Text content of the single matching element
    pub async fn text_content(&self) -> Result<String> {
        Ok(self.wait_for_single().await?.text_content)
    }

    /// Value of the single matching form control
    pub async fn input_value(&self) -> Result<String> {
        let element = self.wait_for_single().await?;
        element.input_value.ok_or_else(|| {
            Error::element_not_interactable(format!(
                "{}: <{}> is not an input, textarea or select",
                self.selector, element.tag_name
            ))
        })
    }

    /// Replace the value of the single matching input, waiting for it to be
    /// attached, visible and editable
    pub async fn fill(&self, value: &str) -> Result<()> {
        debug!("fill {}", self.selector);
        self.retry(|| self.session.fill(&self.selector, value)).await
    }

    /// Wait until exactly one element matches
    async fn wait_for_single(&self) -> Result<ElementSnapshot> {
        self.retry(|| async {
            let mut elements = self.all().await?;
            match elements.len() {
                0 => Err(Error::element_not_found(self.selector.to_string())),
                1 => Ok(elements.remove(0)),
                n => Err(self.ambiguous(n)),
            }
        })
        .await
    }

    fn ambiguous(&self, count: usize) -> Error {
        Error::element_resolution(format!("{} resolved to {} elements", self.selector, count))
    }

    /// Re-run `op` while it fails with a resolution error, within the
    /// session's action timeout. The last error is returned on expiry.
    async fn retry<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let timeouts = self.session.timeouts();
        let deadline = tokio::time::Instant::now() + timeouts.action;

        loop {
            match op().await {
                Err(e) if e.is_resolution() && tokio::time::Instant::now() < deadline => {
                    debug!("{} not ready: {}", self.selector, e);
                    tokio::time::sleep(timeouts.poll_interval).await;
                }
                other => return other,
            }
        }
    }
}

/// Locators are equal when their selectors are
impl PartialEq for Locator {
    fn eq(&self, other: &Self) -> bool {
        self.selector == other.selector
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("session", &self.session.id())
            .field("selector", &self.selector.to_string())
            .finish()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.selector, f)
    }
}
