//! # Session layer
//!
//! The session handle a test drives: one browser tab, shared by every page
//! object and locator built for that test.
//!
//! ## Modules
//! - `traits`: the `Session` contract, timeouts and element snapshots
//! - `selector`: CSS / XPath / `:has-text` query descriptors
//! - `js`: page scripts used by the CDP session
//! - `page`: `CdpSession`, a Chrome tab over CDP
//! - `launcher`: opens one `CdpSession` per test
//! - `mock`: `MockSession`, an in-memory DOM for hermetic tests
//!
//! ## Example
//! ```rust,no_run
//! use pw_practice::config::Config;
//! use pw_practice::session::{Selector, Session, SessionLauncher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionLauncher::new(&Config::from_env()?).launch().await?;
//! session.goto("https://example.com").await?;
//! let headings = session.query(&Selector::parse("h1")).await?;
//! println!("{} heading(s)", headings.len());
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod selector;
pub mod js;
pub mod page;
pub mod launcher;
pub mod mock;

pub use traits::{ElementSnapshot, NavigationResult, Session, Timeouts};
pub use selector::Selector;
pub use page::CdpSession;
pub use launcher::SessionLauncher;
pub use mock::{MockElement, MockPage, MockSession};
