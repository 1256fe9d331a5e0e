//! Session traits
//!
//! The session handle is the live browser tab a test drives. Page objects and
//! locators share it through `Arc<dyn Session>`; whoever created it closes it.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::session::selector::Selector;

/// Wait budgets carried by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Page load budget for `goto`
    pub navigation: Duration,
    /// Implicit wait for element actions and reads
    pub action: Duration,
    /// Retry budget for `expect` assertions
    pub expect: Duration,
    /// Delay between polls while waiting
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            action: Duration::from_secs(5),
            expect: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Navigation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResult {
    /// URL the tab ended up on
    pub url: String,
    /// HTTP status of the main document; `None` for `data:` and `about:` URLs
    pub status_code: Option<u16>,
}

/// State of one element matched by a query
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ElementSnapshot {
    /// Lower-case tag name
    pub tag_name: String,
    pub visible: bool,
    /// `textContent`, empty when the element has none
    #[serde(default)]
    pub text_content: String,
    /// Current value for form controls, `None` for other elements
    #[serde(default)]
    pub input_value: Option<String>,
    pub enabled: bool,
    pub editable: bool,
}

/// Session handle trait
///
/// All operations are single attempts against the current DOM; waiting is
/// layered on top by [`crate::locator::Locator`] and [`crate::expect`].
#[async_trait]
pub trait Session: Send + Sync + std::fmt::Debug {
    /// Session ID
    fn id(&self) -> &str;

    /// Wait budgets for operations on this session
    fn timeouts(&self) -> Timeouts;

    /// Load `url`, failing with [`crate::Error::Navigation`] when it is
    /// malformed, unreachable, or does not load within the navigation budget
    async fn goto(&self, url: &str) -> Result<NavigationResult, crate::Error>;

    /// URL currently loaded
    async fn current_url(&self) -> Result<String, crate::Error>;

    /// Snapshot every element matching `selector`, in document order
    async fn query(&self, selector: &Selector) -> Result<Vec<ElementSnapshot>, crate::Error>;

    /// Replace the value of the single element matching `selector` and
    /// dispatch `input` and `change` events on it
    async fn fill(&self, selector: &Selector, value: &str) -> Result<(), crate::Error>;

    /// Release the tab
    async fn close(&self) -> Result<(), crate::Error>;

    /// Whether the session has not been closed yet
    fn is_active(&self) -> bool;
}
