//! Type-text action — focus an element and type into it.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Duration;

use webpilot_core::action::{Action, ActionSchema, ParamKind, ParamSpec};
use webpilot_core::error::ActionError;

use crate::driver::PageDriver;

pub struct TypeTextAction {
    driver: Arc<dyn PageDriver>,
    timeout: Duration,
}

impl TypeTextAction {
    pub fn new(driver: Arc<dyn PageDriver>, timeout: Duration) -> Self {
        Self { driver, timeout }
    }
}

#[async_trait]
impl Action for TypeTextAction {
    fn name(&self) -> &str {
        "type_text"
    }

    fn description(&self) -> &str {
        "Focus the first element matching a CSS selector and type text into it, optionally pressing Enter afterwards."
    }

    fn schema(&self) -> ActionSchema {
        ActionSchema::new()
            .param(ParamSpec::required(
                "selector",
                ParamKind::String,
                "CSS selector of the input element",
            ))
            .param(ParamSpec::required(
                "text",
                ParamKind::String,
                "The text to type",
            ))
            .param(ParamSpec::optional(
                "press_enter",
                ParamKind::Boolean,
                json!(false),
                "Press Enter after typing (submits most forms)",
            ))
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn invoke(&self, arguments: Map<String, Value>) -> Result<String, ActionError> {
        let selector = arguments["selector"].as_str().unwrap_or_default();
        let text = arguments["text"].as_str().unwrap_or_default();
        let press_enter = arguments["press_enter"].as_bool().unwrap_or(false);

        self.driver
            .type_text(selector, text, press_enter)
            .await
            .map_err(|e| ActionError::ExecutionFailed {
                action: "type_text".into(),
                reason: e.to_string(),
            })?;

        if press_enter {
            Ok(format!("Typed \"{text}\" into '{selector}' and pressed Enter"))
        } else {
            Ok(format!("Typed \"{text}\" into '{selector}'"))
        }
    }
}
