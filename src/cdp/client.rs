//! CDP client
//!
//! Typed page operations over a [`CdpConnection`].

use super::traits::*;
use super::types::*;
use crate::Error;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Interval between `document.readyState` polls after a navigation
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// HTTP status of the main document (0 when the browser has none, e.g. `data:` URLs)
const RESPONSE_STATUS: &str = "(performance.getEntriesByType('navigation')[0] || {}).responseStatus";

/// [`CdpClient`] over any connection
#[derive(Debug, Clone)]
pub struct CdpClientImpl {
    connection: Arc<dyn CdpConnection>,
    /// Upper bound on waiting for `document.readyState == "complete"`
    load_timeout: Duration,
}

impl CdpClientImpl {
    pub fn new(connection: Arc<dyn CdpConnection>) -> Self {
        Self {
            connection,
            load_timeout: Duration::from_secs(30),
        }
    }

    /// Override how long `navigate` waits for the load to complete
    pub fn with_load_timeout(mut self, load_timeout: Duration) -> Self {
        self.load_timeout = load_timeout;
        self
    }

    /// Send `method` with typed parameters and decode its result
    async fn command<P, R>(&self, method: &str, params: P) -> Result<R, Error>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)?;
        let result = self.connection.send_command(method, params).await?;
        serde_json::from_value(result).map_err(|e| Error::cdp(format!("Unexpected {} result: {}", method, e)))
    }

    fn to_evaluation_result(object: RemoteObject) -> EvaluationResult {
        let value = object.value.unwrap_or(serde_json::Value::Null);
        match (object.kind.as_str(), value) {
            (_, serde_json::Value::Null) => EvaluationResult::Null,
            ("string", serde_json::Value::String(s)) => EvaluationResult::String(s),
            ("number", v) => v.as_f64().map_or(EvaluationResult::Null, EvaluationResult::Number),
            ("boolean", serde_json::Value::Bool(b)) => EvaluationResult::Bool(b),
            (_, v) => EvaluationResult::Object(v),
        }
    }

    /// Poll until the document reports `complete`
    async fn wait_for_load(&self) -> Result<(), Error> {
        let deadline = tokio::time::Instant::now() + self.load_timeout;
        let mut polls = 0u32;

        loop {
            polls += 1;
            match self.evaluate("document.readyState").await {
                Ok(EvaluationResult::String(state)) if state == "complete" => {
                    debug!("Page loaded after {} polls", polls);
                    return Ok(());
                }
                Ok(state) => debug!("readyState {:?}", state),
                // The execution context is replaced mid-navigation
                Err(e) => debug!("readyState unavailable: {}", e),
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(Error::timeout(format!(
                    "Page did not finish loading within {}ms",
                    self.load_timeout.as_millis()
                )));
            }
            tokio::time::sleep(LOAD_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl CdpClient for CdpClientImpl {
    fn connection(&self) -> Arc<dyn CdpConnection> {
        Arc::clone(&self.connection)
    }

    async fn navigate(&self, url: &str) -> Result<PageLoad, Error> {
        info!("Navigating to {}", url);

        let response: NavigateResponse = self.command("Page.navigate", NavigateParams { url }).await?;
        if let Some(error_text) = response.error_text.filter(|t| !t.is_empty()) {
            return Err(Error::navigation(format!("{}: {}", url, error_text)));
        }

        self.wait_for_load().await?;

        let url = match self.evaluate("window.location.href").await {
            Ok(EvaluationResult::String(href)) if !href.is_empty() => href,
            _ => url.to_string(),
        };
        let status_code = match self.evaluate(RESPONSE_STATUS).await {
            Ok(EvaluationResult::Number(status)) if status >= 100.0 && status < 600.0 => Some(status as u16),
            _ => None,
        };

        Ok(PageLoad {
            loader_id: response.loader_id,
            url,
            status_code,
        })
    }

    async fn evaluate(&self, expression: &str) -> Result<EvaluationResult, Error> {
        let response: EvaluateResponse = self
            .command(
                "Runtime.evaluate",
                EvaluateParams {
                    expression,
                    return_by_value: true,
                },
            )
            .await?;

        if let Some(exception) = response.exception_details {
            return Err(Error::script_execution_failed(exception.message()));
        }
        Ok(Self::to_evaluation_result(response.result))
    }

    async fn enable_domain(&self, domain: &str) -> Result<(), Error> {
        debug!("Enabling {}", domain);
        self.connection
            .send_command(&format!("{}.enable", domain), serde_json::Value::Null)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdp::mock::MockCdpConnection;
    use serde_json::json;

    fn remote(value: serde_json::Value) -> EvaluationResult {
        CdpClientImpl::to_evaluation_result(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_remote_object_values() {
        assert_eq!(
            remote(json!({ "type": "string", "value": "test" })),
            EvaluationResult::String("test".to_string())
        );
        assert_eq!(remote(json!({ "type": "number", "value": 42.5 })), EvaluationResult::Number(42.5));
        assert_eq!(remote(json!({ "type": "boolean", "value": true })), EvaluationResult::Bool(true));
        assert_eq!(remote(json!({ "type": "object", "value": [1, 2] })), EvaluationResult::Object(json!([1, 2])));
    }

    #[test]
    fn test_remote_object_null_and_undefined() {
        assert_eq!(remote(json!({ "type": "object", "subtype": "null", "value": null })), EvaluationResult::Null);
        assert_eq!(remote(json!({ "type": "undefined" })), EvaluationResult::Null);
    }

    #[tokio::test]
    async fn test_navigate_waits_for_complete() {
        let connection = Arc::new(MockCdpConnection::new());
        connection.push_ready_states(&["loading", "interactive"]).await;
        let client = CdpClientImpl::new(connection.clone());

        let load = client.navigate("https://example.com/").await.unwrap();

        assert_eq!(load.url, "https://example.com/");
        assert_eq!(load.status_code, Some(200));
        assert!(load.loader_id.is_some());
        assert_eq!(connection.count_calls("Page.navigate").await, 1);
        assert!(connection.count_calls("Runtime.evaluate").await >= 4);
    }

    #[tokio::test]
    async fn test_navigate_error_text() {
        let connection = Arc::new(MockCdpConnection::new());
        connection.fail_navigation("net::ERR_NAME_NOT_RESOLVED").await;
        let client = CdpClientImpl::new(connection);

        let err = client.navigate("https://unreachable.invalid/").await.unwrap_err();
        assert!(matches!(err, Error::Navigation(msg) if msg.contains("ERR_NAME_NOT_RESOLVED")));
    }

    #[tokio::test]
    async fn test_navigate_load_timeout() {
        let connection = Arc::new(MockCdpConnection::new());
        connection.push_ready_states(&["loading"; 64]).await;
        let client = CdpClientImpl::new(connection).with_load_timeout(Duration::from_millis(120));

        let err = client.navigate("https://slow.example.com/").await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }

    #[tokio::test]
    async fn test_evaluate_exception() {
        let connection = Arc::new(MockCdpConnection::new());
        connection
            .respond_to_evaluate(json!({
                "result": { "type": "object" },
                "exceptionDetails": { "text": "Uncaught", "exception": { "type": "object", "description": "ReferenceError: x is not defined" } }
            }))
            .await;
        let client = CdpClientImpl::new(connection);

        let err = client.evaluate("x").await.unwrap_err();
        assert!(matches!(err, Error::ScriptExecutionFailed(msg) if msg.contains("ReferenceError")));
    }

    #[tokio::test]
    async fn test_enable_domain() {
        let connection = Arc::new(MockCdpConnection::new());
        let client = CdpClientImpl::new(connection.clone());

        client.enable_domain("Runtime").await.unwrap();
        assert_eq!(connection.count_calls("Runtime.enable").await, 1);
    }
}
