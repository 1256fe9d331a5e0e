//! Error type shared by every layer
//!
//! Transport and protocol failures (`WebSocket`, `Cdp`, ...) surface from the
//! CDP layer; element and assertion failures from locators and `expect`.
//! Nothing in `pages` catches or rewraps them.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Error reply from the browser, or a reply of unexpected shape
    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed, unreachable or slow navigation target
    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Hidden, disabled or read-only
    #[error("Element not interactable: {0}")]
    ElementNotInteractable(String),

    /// More matches than the operation accepts
    #[error("Element resolution failed: {0}")]
    ElementResolution(String),

    /// A web-first assertion ran out of time
    #[error("Assertion failed for `{selector}`: expected {expected}, received {actual}")]
    AssertionMismatch {
        selector: String,
        expected: String,
        actual: String,
    },

    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// Page script threw
    #[error("Script execution failed: {0}")]
    ScriptExecutionFailed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Misuse of a handle, e.g. a closed session
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn websocket<S: Into<String>>(msg: S) -> Self {
        Error::WebSocket(msg.into())
    }

    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }

    pub fn navigation<S: Into<String>>(msg: S) -> Self {
        Error::Navigation(msg.into())
    }

    /// `selector` is reported as-is
    pub fn element_not_found<S: Into<String>>(selector: S) -> Self {
        Error::ElementNotFound(selector.into())
    }

    pub fn element_not_interactable<S: Into<String>>(msg: S) -> Self {
        Error::ElementNotInteractable(msg.into())
    }

    pub fn element_resolution<S: Into<String>>(msg: S) -> Self {
        Error::ElementResolution(msg.into())
    }

    pub fn assertion_mismatch(
        selector: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Error::AssertionMismatch {
            selector: selector.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout(msg.into())
    }

    pub fn script_execution_failed<S: Into<String>>(msg: S) -> Self {
        Error::ScriptExecutionFailed(msg.into())
    }

    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Whether the selector could not (yet) be resolved to a usable element.
    /// Implicit waiting retries only these.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Error::ElementNotFound(_) | Error::ElementNotInteractable(_) | Error::ElementResolution(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_mismatch_message() {
        let err = Error::assertion_mismatch("footer .copyright", "visible", "hidden");
        assert_eq!(
            err.to_string(),
            "Assertion failed for `footer .copyright`: expected visible, received hidden"
        );
    }

    #[test]
    fn test_is_resolution() {
        assert!(Error::element_not_found("#a").is_resolution());
        assert!(Error::element_not_interactable("#a").is_resolution());
        assert!(Error::element_resolution("#a").is_resolution());
        assert!(!Error::navigation("net::ERR_NAME_NOT_RESOLVED").is_resolution());
        assert!(!Error::timeout("slow").is_resolution());
    }

    #[test]
    fn test_from_serde_json() {
        let err: Error = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
