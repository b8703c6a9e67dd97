//! Shared scripted driver for action unit tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::driver::{BrowserError, PageDriver, PageInfo};

/// Records calls and replays canned outcomes.
pub(crate) struct FakeDriver {
    pub calls: Mutex<Vec<String>>,
    pub fail_selector: Option<String>,
    pub page_text: String,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_selector: None,
            page_text: "Example Domain\nThis domain is for use in examples.".into(),
        }
    }

    pub fn failing_on(selector: &str) -> Self {
        Self {
            fail_selector: Some(selector.to_string()),
            ..Self::new()
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, selector: &str) -> Result<(), BrowserError> {
        if self.fail_selector.as_deref() == Some(selector) {
            return Err(BrowserError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn goto(&self, url: &str) -> Result<String, BrowserError> {
        self.record(format!("goto {url}"));
        Ok("Example Domain".into())
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        self.check(selector)?;
        self.record(format!("click {selector}"));
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str, press_enter: bool) -> Result<(), BrowserError> {
        self.check(selector)?;
        self.record(format!("type {selector} '{text}' enter={press_enter}"));
        Ok(())
    }

    async fn extract_text(&self, selector: &str) -> Result<String, BrowserError> {
        self.check(selector)?;
        self.record(format!("extract {selector}"));
        Ok(self.page_text.clone())
    }

    async fn page_info(&self) -> Result<PageInfo, BrowserError> {
        self.record("page_info".into());
        Ok(PageInfo {
            url: "https://example.com/".into(),
            title: "Example Domain".into(),
        })
    }
}
