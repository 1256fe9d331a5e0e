//! Common test utilities
//!
//! Shared fixtures for the integration tests: an in-memory copy of the
//! practice site and setup helpers returning a ready `PageManager`.

#![allow(dead_code)]

use pw_practice::config::Config;
use pw_practice::session::{MockElement, MockPage, MockSession, SessionLauncher, Timeouts};
use pw_practice::{logging, ExamplePage, HomePage, PageManager};
use std::sync::Arc;
use std::time::Duration;

/// Sidebar block headings rendered on the home page
pub const SIDEBAR_HEADINGS: [&str; 4] = ["Recent Posts", "Recent Comments", "Archives", "Categories"];

/// Footer copyright line
pub const COPYRIGHT: &str = "© 2025 Playwright practice site - Dev environment";

/// Timeouts short enough that failing assertions finish quickly
pub fn fast_timeouts() -> Timeouts {
    Timeouts {
        navigation: Duration::from_secs(2),
        action: Duration::from_millis(500),
        expect: Duration::from_millis(500),
        poll_interval: Duration::from_millis(20),
    }
}

/// Home page DOM
pub fn home_page() -> MockPage {
    let page = SIDEBAR_HEADINGS.iter().fold(MockPage::new(), |page, heading| {
        page.with(MockElement::new("h2").matching("h2.wp-block-heading").text(*heading))
    });

    page.with(
        MockElement::new("div")
            .matching("footer .copyright")
            .text(format!("\n        {}\n    ", COPYRIGHT)),
    )
}

/// `wp-admin` login form DOM
pub fn login_page() -> MockPage {
    MockPage::new()
        .with(MockElement::new("input").matching(r#"//input[@id="user_login"]"#).matching("#user_login"))
        .with(MockElement::new("input").matching(r#"//input[@id="user_pass"]"#).matching("#user_pass"))
        .with(MockElement::new("label").matching("label[for=user_login]").text("Username or Email Address"))
}

/// Mock session serving the practice site
pub fn practice_site(timeouts: Timeouts) -> Arc<MockSession> {
    Arc::new(
        MockSession::new(timeouts)
            .with_page(HomePage::URL, home_page())
            .with_page(ExamplePage::URL, login_page()),
    )
}

/// Per-test setup: logging plus a page manager over a fresh mock site
pub fn setup() -> (Arc<MockSession>, PageManager) {
    init_logging();
    let session = practice_site(fast_timeouts());
    let manager = PageManager::new(session.clone());
    (session, manager)
}

/// Per-test setup against the Chrome at `PW_CDP_ENDPOINT`
pub async fn setup_live() -> Result<PageManager, Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init(&config);

    let session = SessionLauncher::new(&config).launch().await?;
    Ok(PageManager::new(session))
}

pub fn init_logging() {
    logging::init(&Config::default());
}
