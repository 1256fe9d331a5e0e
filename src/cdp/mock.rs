//! Mock CDP implementation for testing
//!
//! Scripted in-process stand-ins for a CDP page target and browser endpoint.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::cdp::client::CdpClientImpl;
use crate::cdp::traits::*;
use crate::Error;

/// Mock CDP connection
///
/// Answers `Page.navigate` and `Runtime.evaluate` the way Chrome shapes its
/// responses and records every command it receives.
#[derive(Debug)]
pub struct MockCdpConnection {
    is_active: AtomicBool,
    calls: Mutex<Vec<(String, Value)>>,
    current_url: Mutex<Option<String>>,
    ready_states: Mutex<VecDeque<String>>,
    navigation_error: Mutex<Option<String>>,
    evaluate_response: Mutex<Option<Value>>,
}

impl MockCdpConnection {
    /// Create a new mock CDP connection
    pub fn new() -> Self {
        Self {
            is_active: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
            current_url: Mutex::new(None),
            ready_states: Mutex::new(VecDeque::new()),
            navigation_error: Mutex::new(None),
            evaluate_response: Mutex::new(None),
        }
    }

    /// Queue `document.readyState` values reported before `complete`
    pub async fn push_ready_states(&self, states: &[&str]) {
        self.ready_states
            .lock()
            .await
            .extend(states.iter().map(|s| s.to_string()));
    }

    /// Make every following `Page.navigate` report `errorText`
    pub async fn fail_navigation(&self, error_text: &str) {
        *self.navigation_error.lock().await = Some(error_text.to_string());
    }

    /// Raw `Runtime.evaluate` result returned for page scripts
    pub async fn respond_to_evaluate(&self, response: Value) {
        *self.evaluate_response.lock().await = Some(response);
    }

    /// Number of times `method` was sent
    pub async fn count_calls(&self, method: &str) -> usize {
        self.calls.lock().await.iter().filter(|(m, _)| m == method).count()
    }

    /// Parameters of the most recent `method` call
    pub async fn last_params(&self, method: &str) -> Option<Value> {
        self.calls
            .lock()
            .await
            .iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
    }

    async fn evaluate(&self, params: &Value) -> Value {
        let expression = params.get("expression").and_then(|e| e.as_str()).unwrap_or_default();

        if expression == "document.readyState" {
            let state = self
                .ready_states
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| "complete".to_string());
            return json!({ "result": { "type": "string", "value": state } });
        }

        if let Some(response) = self.evaluate_response.lock().await.clone() {
            return response;
        }

        if expression == "window.location.href" {
            let url = self.current_url.lock().await.clone().unwrap_or_else(|| "about:blank".to_string());
            return json!({ "result": { "type": "string", "value": url } });
        }

        if expression.contains("responseStatus") {
            return json!({ "result": { "type": "number", "value": 200 } });
        }

        json!({ "result": { "type": "string", "value": "mock result" } })
    }
}

impl Default for MockCdpConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CdpConnection for MockCdpConnection {
    async fn send_command(&self, method: &str, params: Value) -> Result<Value, Error> {
        if !self.is_active.load(Ordering::Relaxed) {
            return Err(Error::websocket("Connection is not active"));
        }
        self.calls.lock().await.push((method.to_string(), params.clone()));

        let result = match method {
            "Page.navigate" => {
                let url = params.get("url").and_then(|u| u.as_str()).unwrap_or_default();
                let mut result = json!({
                    "frameId": uuid::Uuid::new_v4().to_string(),
                    "loaderId": uuid::Uuid::new_v4().to_string(),
                });
                match self.navigation_error.lock().await.clone() {
                    Some(error_text) => result["errorText"] = json!(error_text),
                    None => *self.current_url.lock().await = Some(url.to_string()),
                }
                result
            }
            "Runtime.evaluate" => self.evaluate(&params).await,
            _ => json!({}),
        };
        Ok(result)
    }

    async fn close(&self) -> Result<(), Error> {
        self.is_active.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::Relaxed)
    }
}

/// Mock CDP browser endpoint
///
/// Hands out page targets backed by [`MockCdpConnection`]s.
#[derive(Debug, Default)]
pub struct MockCdpBrowser {
    connections: Mutex<Vec<Arc<MockCdpConnection>>>,
    load_timeouts: Mutex<Vec<Duration>>,
    closed_targets: Mutex<Vec<String>>,
}

impl MockCdpBrowser {
    /// Create a new mock CDP browser
    pub fn new() -> Self {
        Self::default()
    }

    /// Connections handed out so far, in creation order
    pub async fn connections(&self) -> Vec<Arc<MockCdpConnection>> {
        self.connections.lock().await.clone()
    }

    /// Load timeouts passed to `create_client`, in call order
    pub async fn load_timeouts(&self) -> Vec<Duration> {
        self.load_timeouts.lock().await.clone()
    }

    /// Target IDs passed to `close_target`
    pub async fn closed_targets(&self) -> Vec<String> {
        self.closed_targets.lock().await.clone()
    }
}

#[async_trait]
impl CdpBrowser for MockCdpBrowser {
    async fn create_client(&self, _target_url: &str, load_timeout: Duration) -> Result<Arc<dyn CdpClient>, Error> {
        let connection = Arc::new(MockCdpConnection::new());
        self.connections.lock().await.push(Arc::clone(&connection));
        self.load_timeouts.lock().await.push(load_timeout);
        Ok(Arc::new(CdpClientImpl::new(connection).with_load_timeout(load_timeout)))
    }

    async fn create_target(&self, _url: &str) -> Result<(String, String), Error> {
        let target_id = uuid::Uuid::new_v4().to_string();
        let ws_url = format!("ws://localhost:9222/devtools/page/{}", target_id);
        Ok((target_id, ws_url))
    }

    async fn close_target(&self, target_id: &str) -> Result<(), Error> {
        self.closed_targets.lock().await.push(target_id.to_string());
        Ok(())
    }
}
