//! Web-first assertions
//!
//! `expect(&locator)` retries its condition until it holds or the session's
//! expect timeout elapses, then reports an [`Error::AssertionMismatch`].
//!
//! ```rust,no_run
//! use pw_practice::expect::{expect, ContainTextOptions};
//! # async fn example(footer: pw_practice::Locator) -> pw_practice::Result<()> {
//! expect(&footer)
//!     .to_contain_text("Dev environment", ContainTextOptions { ignore_case: true })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;
use tracing::debug;

use crate::locator::Locator;
use crate::session::selector::normalize_whitespace;
use crate::session::ElementSnapshot;
use crate::{Error, Result};

/// Options for [`LocatorAssertions::to_contain_text`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainTextOptions {
    pub ignore_case: bool,
}

/// Start an assertion on `locator`
pub fn expect(locator: &Locator) -> LocatorAssertions<'_> {
    LocatorAssertions {
        locator,
        timeout: locator.session().timeouts().expect,
    }
}

/// Assertions over one locator
#[derive(Debug, Clone)]
pub struct LocatorAssertions<'a> {
    locator: &'a Locator,
    timeout: Duration,
}

/// Outcome of one evaluation of an assertion
enum Check {
    Pass,
    Fail { actual: String },
}

impl<'a> LocatorAssertions<'a> {
    /// Override the retry budget for this assertion
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The single matching element is visible
    pub async fn to_be_visible(&self) -> Result<()> {
        self.poll("visible", |elements| match single(elements) {
            Ok(element) if element.visible => Check::Pass,
            Ok(_) => Check::Fail {
                actual: "hidden".to_string(),
            },
            Err(actual) => Check::Fail { actual },
        })
        .await
    }

    /// Nothing matches, or the single match is hidden
    pub async fn to_be_hidden(&self) -> Result<()> {
        self.poll("hidden", |elements| match single(elements) {
            Ok(element) if element.visible => Check::Fail {
                actual: "visible".to_string(),
            },
            Ok(_) => Check::Pass,
            Err(_) if elements.is_empty() => Check::Pass,
            Err(actual) => Check::Fail { actual },
        })
        .await
    }

    /// The single matching element's text contains `expected`, ignoring
    /// whitespace differences
    pub async fn to_contain_text(&self, expected: &str, options: ContainTextOptions) -> Result<()> {
        let fold = |s: &str| {
            let s = normalize_whitespace(s);
            if options.ignore_case {
                s.to_lowercase()
            } else {
                s
            }
        };
        let needle = fold(expected);

        self.poll(&format!("text containing {:?}", expected), |elements| {
            match single(elements) {
                Ok(element) if fold(&element.text_content).contains(&needle) => Check::Pass,
                Ok(element) => Check::Fail {
                    actual: format!("{:?}", normalize_whitespace(&element.text_content)),
                },
                Err(actual) => Check::Fail { actual },
            }
        })
        .await
    }

    /// The single matching form control holds exactly `expected`
    pub async fn to_have_value(&self, expected: &str) -> Result<()> {
        self.poll(&format!("value {:?}", expected), |elements| match single(elements) {
            Ok(element) => match &element.input_value {
                Some(value) if value == expected => Check::Pass,
                Some(value) => Check::Fail {
                    actual: format!("{:?}", value),
                },
                None => Check::Fail {
                    actual: format!("<{}> without a value", element.tag_name),
                },
            },
            Err(actual) => Check::Fail { actual },
        })
        .await
    }

    /// Re-evaluate `check` until it passes or the timeout elapses
    async fn poll<F>(&self, expected: &str, check: F) -> Result<()>
    where
        F: Fn(&[ElementSnapshot]) -> Check,
    {
        let poll_interval = self.locator.session().timeouts().poll_interval;
        let deadline = tokio::time::Instant::now() + self.timeout;

        loop {
            let elements = self.locator.all().await?;
            let actual = match check(&elements) {
                Check::Pass => return Ok(()),
                Check::Fail { actual } => actual,
            };

            if tokio::time::Instant::now() >= deadline {
                debug!("expect({}) gave up: {}", self.locator, actual);
                return Err(Error::assertion_mismatch(self.locator.selector().to_string(), expected, actual));
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// Strict-mode resolution for single-element assertions
fn single(elements: &[ElementSnapshot]) -> std::result::Result<&ElementSnapshot, String> {
    match elements {
        [element] => Ok(element),
        [] => Err("<element(s) not found>".to_string()),
        many => Err(format!("<resolved to {} elements>", many.len())),
    }
}
