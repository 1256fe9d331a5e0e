//! In-memory session for hermetic tests
//!
//! A [`MockSession`] serves registered pages as flat lists of
//! [`MockElement`]s. An element declares the selector strings it answers to,
//! so no CSS or XPath engine is involved; `:has-text` is evaluated against the
//! element's text the same way the browser script does.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::session::selector::{text_matches, Selector};
use crate::session::traits::{ElementSnapshot, NavigationResult, Session, Timeouts};
use crate::Error;

/// One element of a mock page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    tag_name: String,
    selectors: Vec<String>,
    text: String,
    value: Option<String>,
    visible: bool,
    enabled: bool,
    read_only: bool,
}

impl MockElement {
    /// Visible, enabled element with no text
    pub fn new(tag_name: impl Into<String>) -> Self {
        let tag_name = tag_name.into().to_lowercase();
        let value = matches!(tag_name.as_str(), "input" | "textarea" | "select").then(String::new);
        Self {
            tag_name,
            selectors: Vec::new(),
            text: String::new(),
            value,
            visible: true,
            enabled: true,
            read_only: false,
        }
    }

    /// Declare a CSS or XPath selector string this element matches
    pub fn matching(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    /// Text content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Initial value of a form control
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Render the element hidden
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Disable the element
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Make a form control read-only
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_editable(&self) -> bool {
        matches!(self.tag_name.as_str(), "input" | "textarea") && self.enabled && !self.read_only
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Css(s) | Selector::XPath(s) => self.selectors.iter().any(|m| m == s),
            Selector::HasText { css, text } => {
                self.selectors.iter().any(|m| m == css) && text_matches(&self.text, text)
            }
        }
    }

    fn snapshot(&self) -> ElementSnapshot {
        ElementSnapshot {
            tag_name: self.tag_name.clone(),
            visible: self.visible,
            text_content: self.text.clone(),
            input_value: self.value.clone(),
            enabled: self.enabled,
            editable: self.is_editable(),
        }
    }
}

/// Elements served for one URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockPage {
    elements: Vec<MockElement>,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element in document order
    pub fn with(mut self, element: MockElement) -> Self {
        self.elements.push(element);
        self
    }
}

/// Page currently loaded in the mock tab
#[derive(Debug)]
struct LoadedPage {
    url: String,
    page: MockPage,
}

/// In-memory session
#[derive(Debug)]
pub struct MockSession {
    id: String,
    timeouts: Timeouts,
    pages: HashMap<String, MockPage>,
    load_delay: Duration,
    loaded: Mutex<Option<LoadedPage>>,
    history: Mutex<Vec<String>>,
    is_active: AtomicBool,
}

/// Canonical form used as page key (`https://host` and `https://host/` agree)
fn canonical_url(url: &str) -> Option<String> {
    reqwest::Url::parse(url).ok().map(|u| u.to_string())
}

impl MockSession {
    pub fn new(timeouts: Timeouts) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timeouts,
            pages: HashMap::new(),
            load_delay: Duration::ZERO,
            loaded: Mutex::new(None),
            history: Mutex::new(Vec::new()),
            is_active: AtomicBool::new(true),
        }
    }

    /// Serve `page` at `url`; a fresh copy is loaded on every navigation
    pub fn with_page(mut self, url: &str, page: MockPage) -> Self {
        let key = canonical_url(url).unwrap_or_else(|| url.to_string());
        self.pages.insert(key, page);
        self
    }

    /// Delay every page load, to exercise navigation timeouts
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// URLs navigated to successfully, in order
    pub async fn history(&self) -> Vec<String> {
        self.history.lock().await.clone()
    }

    /// Apply `f` to every element of the loaded page matching `selector`,
    /// returning how many were touched
    pub async fn update<F>(&self, selector: &str, mut f: F) -> usize
    where
        F: FnMut(&mut MockElement),
    {
        let selector = Selector::parse(selector);
        let mut loaded = self.loaded.lock().await;
        let Some(loaded) = loaded.as_mut() else {
            return 0;
        };

        let mut touched = 0;
        for element in loaded.page.elements.iter_mut().filter(|e| e.matches(&selector)) {
            f(element);
            touched += 1;
        }
        touched
    }

    /// Append an element to the loaded page
    pub async fn insert(&self, element: MockElement) -> Result<(), Error> {
        let mut loaded = self.loaded.lock().await;
        let loaded = loaded
            .as_mut()
            .ok_or_else(|| Error::internal("No page loaded"))?;
        loaded.page.elements.push(element);
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), Error> {
        if self.is_active.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::internal(format!("Session {} is closed", self.id)))
        }
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new(Timeouts::default())
    }
}

#[async_trait]
impl Session for MockSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    async fn goto(&self, url: &str) -> Result<NavigationResult, Error> {
        self.ensure_active()?;

        let key = canonical_url(url).ok_or_else(|| Error::navigation(format!("{}: invalid URL", url)))?;
        let page = self
            .pages
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::navigation(format!("{}: net::ERR_NAME_NOT_RESOLVED", url)))?;

        if !self.load_delay.is_zero() {
            if self.load_delay > self.timeouts.navigation {
                tokio::time::sleep(self.timeouts.navigation).await;
                return Err(Error::navigation(format!(
                    "{}: timeout {}ms exceeded",
                    url,
                    self.timeouts.navigation.as_millis()
                )));
            }
            tokio::time::sleep(self.load_delay).await;
        }

        debug!("Mock session {} loaded {}", self.id, key);
        *self.loaded.lock().await = Some(LoadedPage {
            url: key.clone(),
            page,
        });
        self.history.lock().await.push(key.clone());

        Ok(NavigationResult {
            url: key,
            status_code: Some(200),
        })
    }

    async fn current_url(&self) -> Result<String, Error> {
        self.ensure_active()?;

        Ok(self
            .loaded
            .lock()
            .await
            .as_ref()
            .map(|l| l.url.clone())
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn query(&self, selector: &Selector) -> Result<Vec<ElementSnapshot>, Error> {
        self.ensure_active()?;

        let loaded = self.loaded.lock().await;
        Ok(loaded
            .as_ref()
            .map(|l| {
                l.page
                    .elements
                    .iter()
                    .filter(|e| e.matches(selector))
                    .map(MockElement::snapshot)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fill(&self, selector: &Selector, value: &str) -> Result<(), Error> {
        self.ensure_active()?;

        let mut loaded = self.loaded.lock().await;
        let mut matched: Vec<&mut MockElement> = match loaded.as_mut() {
            Some(l) => l.page.elements.iter_mut().filter(|e| e.matches(selector)).collect(),
            None => Vec::new(),
        };

        let element = match matched.len() {
            0 => return Err(Error::element_not_found(selector.to_string())),
            1 => &mut matched[0],
            n => {
                return Err(Error::element_resolution(format!(
                    "{} resolved to {} elements",
                    selector, n
                )))
            }
        };

        if !element.visible {
            return Err(Error::element_not_interactable(format!("{}: element is not visible", selector)));
        }
        if !element.enabled {
            return Err(Error::element_not_interactable(format!("{}: element is disabled", selector)));
        }
        if !element.is_editable() {
            return Err(Error::element_not_interactable(format!("{}: element is not editable", selector)));
        }

        element.value = Some(value.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<(), Error> {
        self.is_active.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://site.test";

    fn session() -> MockSession {
        MockSession::default().with_page(
            URL,
            MockPage::new()
                .with(MockElement::new("h2").matching("h2.title").text("Recent Posts"))
                .with(MockElement::new("h2").matching("h2.title").text("Archives"))
                .with(MockElement::new("input").matching("#name"))
                .with(MockElement::new("input").matching("#locked").read_only())
                .with(MockElement::new("input").matching("#ghost").hidden()),
        )
    }

    #[tokio::test]
    async fn test_goto_canonicalises_url() {
        let session = session();
        let result = session.goto(URL).await.unwrap();
        assert_eq!(result.url, "https://site.test/");
        assert_eq!(session.current_url().await.unwrap(), "https://site.test/");
        assert_eq!(session.history().await, vec!["https://site.test/".to_string()]);
    }

    #[tokio::test]
    async fn test_goto_unknown_and_malformed() {
        let session = session();
        assert!(matches!(session.goto("https://elsewhere.test").await, Err(Error::Navigation(_))));
        assert!(matches!(session.goto("::::").await, Err(Error::Navigation(_))));
        assert!(session.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_goto_load_delay_beyond_budget() {
        let timeouts = Timeouts {
            navigation: Duration::from_millis(50),
            ..Timeouts::default()
        };
        let session = MockSession::new(timeouts)
            .with_page(URL, MockPage::new())
            .with_load_delay(Duration::from_secs(10));

        let err = session.goto(URL).await.unwrap_err();
        assert!(matches!(err, Error::Navigation(msg) if msg.contains("timeout")));
    }

    #[tokio::test]
    async fn test_query_before_navigation_is_empty() {
        let session = session();
        assert!(session.query(&Selector::css("h2.title")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_has_text() {
        let session = session();
        session.goto(URL).await.unwrap();

        let all = session.query(&Selector::css("h2.title")).await.unwrap();
        assert_eq!(all.len(), 2);

        let archives = session.query(&Selector::has_text("h2.title", "archives")).await.unwrap();
        assert_eq!(archives.len(), 1);
        assert_eq!(archives[0].text_content, "Archives");
    }

    #[tokio::test]
    async fn test_fill_errors() {
        let session = session();
        session.goto(URL).await.unwrap();

        assert!(matches!(session.fill(&Selector::css("#missing"), "x").await, Err(Error::ElementNotFound(_))));
        assert!(matches!(session.fill(&Selector::css("h2.title"), "x").await, Err(Error::ElementResolution(_))));
        assert!(matches!(
            session.fill(&Selector::css("#locked"), "x").await,
            Err(Error::ElementNotInteractable(_))
        ));
        assert!(matches!(
            session.fill(&Selector::css("#ghost"), "x").await,
            Err(Error::ElementNotInteractable(_))
        ));
    }

    #[tokio::test]
    async fn test_fill_sets_value_and_navigation_resets_it() {
        let session = session();
        session.goto(URL).await.unwrap();

        session.fill(&Selector::css("#name"), "admin").await.unwrap();
        let name = session.query(&Selector::css("#name")).await.unwrap();
        assert_eq!(name[0].input_value.as_deref(), Some("admin"));

        session.goto(URL).await.unwrap();
        let name = session.query(&Selector::css("#name")).await.unwrap();
        assert_eq!(name[0].input_value.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_update_and_close() {
        let session = session();
        session.goto(URL).await.unwrap();

        let touched = session.update("#ghost", |e| e.set_visible(true)).await;
        assert_eq!(touched, 1);
        assert!(session.query(&Selector::css("#ghost")).await.unwrap()[0].visible);

        session.close().await.unwrap();
        assert!(!session.is_active());
        assert!(session.query(&Selector::css("#ghost")).await.is_err());
    }
}
