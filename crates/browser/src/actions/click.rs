//! Click action — click the first element matching a CSS selector.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

use webpilot_core::action::{Action, ActionSchema, ParamKind, ParamSpec};
use webpilot_core::error::ActionError;

use crate::driver::PageDriver;

pub struct ClickAction {
    driver: Arc<dyn PageDriver>,
    timeout: Duration,
}

impl ClickAction {
    pub fn new(driver: Arc<dyn PageDriver>, timeout: Duration) -> Self {
        Self { driver, timeout }
    }
}

#[async_trait]
impl Action for ClickAction {
    fn name(&self) -> &str {
        "click"
    }

    fn description(&self) -> &str {
        "Click the first element matching a CSS selector."
    }

    fn schema(&self) -> ActionSchema {
        ActionSchema::new().param(ParamSpec::required(
            "selector",
            ParamKind::String,
            "CSS selector of the element to click",
        ))
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn invoke(&self, arguments: Map<String, Value>) -> Result<String, ActionError> {
        let selector = arguments["selector"].as_str().unwrap_or_default();
        self.driver
            .click(selector)
            .await
            .map_err(|e| ActionError::ExecutionFailed {
                action: "click".into(),
                reason: e.to_string(),
            })?;
        Ok(format!("Clicked element matching '{selector}'"))
    }
}
