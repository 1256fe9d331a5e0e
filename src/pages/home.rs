//! Practice site home page

use std::sync::Arc;

use crate::locator::Locator;
use crate::pages::Navigable;
use crate::session::{Selector, Session};

/// Landing page with the blog sidebar and footer
#[derive(Debug, Clone)]
pub struct HomePage {
    session: Arc<dyn Session>,
    /// Copyright line in the footer
    pub footer_copyright: Locator,
}

impl HomePage {
    pub const URL: &'static str = "https://pw-practice-dev.playwrightvn.com";

    pub fn new(session: Arc<dyn Session>) -> Self {
        Self {
            footer_copyright: Locator::new(Arc::clone(&session), "footer .copyright"),
            session,
        }
    }

    /// Sidebar block heading whose text contains `heading`
    pub fn sidebar_heading(&self, heading: &str) -> Locator {
        Locator::new(
            Arc::clone(&self.session),
            Selector::has_text("h2.wp-block-heading", heading),
        )
    }
}

impl Navigable for HomePage {
    fn url(&self) -> &str {
        Self::URL
    }

    fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }
}
