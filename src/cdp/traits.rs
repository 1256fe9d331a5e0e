//! Seams of the CDP layer
//!
//! Each trait has a WebSocket/HTTP implementation and a scripted mock in
//! [`crate::cdp::mock`].

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::Error;

/// Transport to one page target
#[async_trait]
pub trait CdpConnection: Send + Sync + std::fmt::Debug {
    /// Send `method` and wait for its `result` object. A protocol-level
    /// error reply is returned as [`Error::Cdp`].
    async fn send_command(&self, method: &str, params: Value) -> Result<Value, Error>;

    async fn close(&self) -> Result<(), Error>;

    fn is_active(&self) -> bool;
}

/// Typed page operations on top of a [`CdpConnection`]
#[async_trait]
pub trait CdpClient: Send + Sync + std::fmt::Debug {
    fn connection(&self) -> Arc<dyn CdpConnection>;

    /// Navigate and wait until `document.readyState` is `complete`
    async fn navigate(&self, url: &str) -> Result<PageLoad, Error>;

    /// Evaluate an expression in the page, returning its value
    async fn evaluate(&self, expression: &str) -> Result<EvaluationResult, Error>;

    /// Send `<domain>.enable`
    async fn enable_domain(&self, domain: &str) -> Result<(), Error>;
}

/// Completed navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLoad {
    /// Absent for same-document navigations
    pub loader_id: Option<String>,
    /// `window.location.href` once loaded
    pub url: String,
    /// HTTP status of the main document, when the browser reports one
    pub status_code: Option<u16>,
}

/// Value returned by `Runtime.evaluate`
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    String(String),
    Number(f64),
    Bool(bool),
    /// `null` and `undefined`
    Null,
    /// Objects and arrays, by value
    Object(Value),
}

/// Browser-level endpoint: opens and closes page targets
#[async_trait]
pub trait CdpBrowser: Send + Sync + std::fmt::Debug {
    /// Connect a client to a page target's WebSocket URL. Its `navigate`
    /// waits at most `load_timeout` for the document to load.
    async fn create_client(&self, target_url: &str, load_timeout: Duration) -> Result<Arc<dyn CdpClient>, Error>;

    /// Open a page target at `url`, returning `(target_id, websocket_url)`
    async fn create_target(&self, url: &str) -> Result<(String, String), Error>;

    async fn close_target(&self, target_id: &str) -> Result<(), Error>;
}
