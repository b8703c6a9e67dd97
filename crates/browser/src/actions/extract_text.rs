//! Extract-text action — pull visible text out of the page.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Duration;

use webpilot_core::action::{Action, ActionSchema, ParamKind, ParamSpec};
use webpilot_core::error::ActionError;

use crate::actions::truncate;
use crate::driver::PageDriver;

pub struct ExtractTextAction {
    driver: Arc<dyn PageDriver>,
    timeout: Duration,
    max_chars: usize,
}

impl ExtractTextAction {
    pub fn new(driver: Arc<dyn PageDriver>, timeout: Duration, max_chars: usize) -> Self {
        Self {
            driver,
            timeout,
            max_chars,
        }
    }
}

#[async_trait]
impl Action for ExtractTextAction {
    fn name(&self) -> &str {
        "extract_text"
    }

    fn description(&self) -> &str {
        "Extract the visible text of the first element matching a CSS selector. Defaults to the whole page body."
    }

    fn schema(&self) -> ActionSchema {
        ActionSchema::new().param(ParamSpec::optional(
            "selector",
            ParamKind::String,
            json!("body"),
            "CSS selector to extract from (default: body)",
        ))
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn invoke(&self, arguments: Map<String, Value>) -> Result<String, ActionError> {
        let selector = arguments["selector"].as_str().unwrap_or("body");
        let text = self
            .driver
            .extract_text(selector)
            .await
            .map_err(|e| ActionError::ExecutionFailed {
                action: "extract_text".into(),
                reason: e.to_string(),
            })?;

        if text.trim().is_empty() {
            return Ok(format!("Element '{selector}' has no visible text"));
        }
        Ok(truncate(&text, self.max_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::FakeDriver;

    #[tokio::test]
    async fn defaults_to_body() {
        let driver = Arc::new(FakeDriver::new());
        let action = ExtractTextAction::new(driver.clone(), Duration::from_secs(30), 4000);

        let args = action.schema().validate(&json!({})).unwrap();
        let output = action.invoke(args).await.unwrap();

        assert!(output.contains("Example Domain"));
        assert_eq!(driver.calls.lock().unwrap().as_slice(), ["extract body"]);
    }

    #[tokio::test]
    async fn output_is_truncated() {
        let driver = Arc::new(FakeDriver {
            page_text: "word ".repeat(2000),
            ..FakeDriver::new()
        });
        let action = ExtractTextAction::new(driver, Duration::from_secs(30), 100);

        let args = action.schema().validate(&json!({})).unwrap();
        let output = action.invoke(args).await.unwrap();
        assert!(output.contains("truncated at 100"));
    }
}
