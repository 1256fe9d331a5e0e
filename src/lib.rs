//! pw-practice: page-object UI tests for the Playwright practice site
//!
//! Page objects ([`pages`]) wrap locators ([`Locator`]) for each page; tests
//! drive them through a session handle ([`session::Session`]) backed by Chrome
//! over the DevTools Protocol, or by an in-memory DOM.

pub mod error;
pub mod config;
pub mod logging;

pub mod cdp;
pub mod session;
pub mod locator;
pub mod expect;
pub mod pages;

// Re-exports
pub use error::{Error, Result};
pub use expect::{expect, ContainTextOptions};
pub use locator::Locator;
pub use pages::{ExamplePage, HomePage, Navigable, PageManager};

/// pw-practice library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
