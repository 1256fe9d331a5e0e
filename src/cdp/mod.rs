//! # Chrome DevTools Protocol (CDP) layer
//!
//! WebSocket transport to a Chrome page target plus the handful of typed
//! operations the session layer builds on.
//!
//! ## Modules
//! - `traits`: connection, client and browser-endpoint interfaces
//! - `types`: JSON-RPC wire structures
//! - `connection`: WebSocket connection with id-correlated responses
//! - `client`: typed client (`navigate`, `evaluate`, `enable_domain`)
//! - `browser`: remote-debugging HTTP API (open/close page targets)
//! - `mock`: scripted in-process implementations for tests
//!
//! ## Example
//! ```rust,no_run
//! use pw_practice::cdp::{CdpBrowser, CdpBrowserImpl, CdpClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let browser = CdpBrowserImpl::new("ws://localhost:9222");
//! let (_target_id, ws_url) = browser.create_target("about:blank").await?;
//! let client = browser.create_client(&ws_url, Duration::from_secs(30)).await?;
//!
//! let load = client.navigate("https://example.com").await?;
//! println!("Loaded {} ({:?})", load.url, load.status_code);
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod types;
pub mod connection;
pub mod client;
pub mod browser;
pub mod mock;

pub use traits::{CdpBrowser, CdpClient, CdpConnection, EvaluationResult, PageLoad};

pub use connection::CdpWebSocketConnection;
pub use client::CdpClientImpl;
pub use browser::CdpBrowserImpl;

pub use mock::{MockCdpConnection, MockCdpBrowser};
