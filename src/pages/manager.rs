//! Page object factory

use std::sync::Arc;

use crate::pages::{ExamplePage, HomePage};
use crate::session::Session;

/// Builds page objects bound to one session.
///
/// Every call returns a new instance; nothing is cached.
#[derive(Debug, Clone)]
pub struct PageManager {
    session: Arc<dyn Session>,
}

impl PageManager {
    pub fn new(session: Arc<dyn Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    pub fn home_page(&self) -> HomePage {
        HomePage::new(Arc::clone(&self.session))
    }

    pub fn example_page(&self) -> ExamplePage {
        ExamplePage::new(Arc::clone(&self.session))
    }
}
