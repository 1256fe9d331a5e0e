//! Practice site login page

use std::sync::Arc;

use crate::locator::Locator;
use crate::pages::Navigable;
use crate::session::Session;
use crate::Result;

/// `wp-admin` login form
#[derive(Debug, Clone)]
pub struct ExamplePage {
    session: Arc<dyn Session>,
    pub username_input: Locator,
}

impl ExamplePage {
    pub const URL: &'static str = "https://pw-practice-dev.playwrightvn.com/wp-admin";

    pub fn new(session: Arc<dyn Session>) -> Self {
        Self {
            username_input: Locator::new(Arc::clone(&session), r#"//input[@id="user_login"]"#),
            session,
        }
    }

    /// Type `username` into the login field
    pub async fn fill_user_name(&self, username: &str) -> Result<()> {
        self.username_input.fill(username).await
    }
}

impl Navigable for ExamplePage {
    fn url(&self) -> &str {
        Self::URL
    }

    fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }
}
