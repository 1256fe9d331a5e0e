//! Capability shared by every page object

use async_trait::async_trait;
use std::sync::Arc;

use crate::session::{NavigationResult, Session};
use crate::Result;

/// A page object with a fixed navigation target
#[async_trait]
pub trait Navigable: Send + Sync {
    /// Canonical URL of the page
    fn url(&self) -> &str;

    /// Session the page object was built against
    fn session(&self) -> &Arc<dyn Session>;

    /// Load [`Navigable::url`] in the session. Navigation errors are returned
    /// as-is.
    async fn navigate_to(&self) -> Result<NavigationResult> {
        self.session().goto(self.url()).await
    }
}
