//! CDP wire types
//!
//! JSON-RPC envelopes plus the parameter and result shapes of the few
//! commands the client sends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// Outgoing command
#[derive(Debug, Clone, Serialize)]
pub struct CdpRequest<'a> {
    pub id: u64,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

/// Incoming frame: a reply when `id` is set, an event otherwise
#[derive(Debug, Clone, Deserialize)]
pub struct CdpMessage {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<CdpErrorDetail>,
}

impl CdpMessage {
    /// Result of a reply to `method`, or its protocol error
    pub fn into_result(self, method: &str) -> Result<Value, Error> {
        match self.error {
            Some(error) => Err(Error::cdp(format!("{}: {} (code: {})", method, error.message, error.code))),
            None => Ok(self.result),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CdpErrorDetail {
    pub code: i32,
    pub message: String,
}

/// `Page.navigate` parameters
#[derive(Debug, Clone, Serialize)]
pub struct NavigateParams<'a> {
    pub url: &'a str,
}

/// `Page.navigate` result
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigateResponse {
    pub frame_id: String,
    /// Absent for same-document navigations
    pub loader_id: Option<String>,
    /// Set when the navigation failed (e.g. "net::ERR_NAME_NOT_RESOLVED")
    pub error_text: Option<String>,
}

/// `Runtime.evaluate` parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams<'a> {
    pub expression: &'a str,
    pub return_by_value: bool,
}

/// Result of an evaluation, by value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoteObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub subtype: Option<String>,
    pub value: Option<Value>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExceptionDetails {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
    /// Most descriptive message available
    pub fn message(&self) -> String {
        self.exception
            .as_ref()
            .and_then(|e| e.description.clone())
            .or_else(|| self.text.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// `Runtime.evaluate` result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    #[serde(default)]
    pub result: RemoteObject,
    #[serde(default)]
    pub exception_details: Option<ExceptionDetails>,
}
