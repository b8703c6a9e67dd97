//! Page-info action — report the current URL and title.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

use webpilot_core::action::{Action, ActionSchema};
use webpilot_core::error::ActionError;

use crate::driver::PageDriver;

pub struct PageInfoAction {
    driver: Arc<dyn PageDriver>,
    timeout: Duration,
}

impl PageInfoAction {
    pub fn new(driver: Arc<dyn PageDriver>, timeout: Duration) -> Self {
        Self { driver, timeout }
    }
}

#[async_trait]
impl Action for PageInfoAction {
    fn name(&self) -> &str {
        "page_info"
    }

    fn description(&self) -> &str {
        "Report the current page URL and title."
    }

    fn schema(&self) -> ActionSchema {
        ActionSchema::new()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn invoke(&self, _arguments: Map<String, Value>) -> Result<String, ActionError> {
        let info = self
            .driver
            .page_info()
            .await
            .map_err(|e| ActionError::ExecutionFailed {
                action: "page_info".into(),
                reason: e.to_string(),
            })?;
        Ok(format!("URL: {}\nTitle: {}", info.url, info.title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::FakeDriver;
    use serde_json::json;

    #[tokio::test]
    async fn reports_url_and_title() {
        let driver = Arc::new(FakeDriver::new());
        let action = PageInfoAction::new(driver, Duration::from_secs(30));

        let args = action.schema().validate(&json!({})).unwrap();
        let output = action.invoke(args).await.unwrap();
        assert!(output.contains("https://example.com/"));
        assert!(output.contains("Example Domain"));
    }
}
