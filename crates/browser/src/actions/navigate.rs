//! Navigate action — load a URL in the driven page.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

use webpilot_core::action::{Action, ActionSchema, ParamKind, ParamSpec};
use webpilot_core::error::ActionError;

use crate::driver::PageDriver;

pub struct NavigateAction {
    driver: Arc<dyn PageDriver>,
    timeout: Duration,
}

impl NavigateAction {
    pub fn new(driver: Arc<dyn PageDriver>, timeout: Duration) -> Self {
        Self { driver, timeout }
    }
}

#[async_trait]
impl Action for NavigateAction {
    fn name(&self) -> &str {
        "navigate"
    }

    fn description(&self) -> &str {
        "Navigate the browser to a URL and wait for the page to load."
    }

    fn schema(&self) -> ActionSchema {
        ActionSchema::new().param(ParamSpec::required(
            "url",
            ParamKind::String,
            "The absolute URL to open, including the scheme",
        ))
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn invoke(&self, arguments: Map<String, Value>) -> Result<String, ActionError> {
        let url = arguments["url"].as_str().unwrap_or_default();
        let title = self
            .driver
            .goto(url)
            .await
            .map_err(|e| ActionError::ExecutionFailed {
                action: "navigate".into(),
                reason: e.to_string(),
            })?;
        Ok(format!("Navigated to {url} — page title: \"{title}\""))
    }
}
