//! CLI command implementations.

pub mod actions;
pub mod chat;
pub mod onboard;
pub mod run;

use std::sync::Arc;
use std::time::Duration;

use webpilot_agent::Session;
use webpilot_browser::{ChromiumDriver, default_catalog};
use webpilot_config::AppConfig;
use webpilot_core::EventBus;
use webpilot_providers::create_oracle;

/// The standing instruction every session starts with, unless the config
/// overrides it.
const DEFAULT_INSTRUCTION: &str = "\
You are webpilot, an assistant that answers questions by driving a real web \
browser. Use the available actions to navigate, click, type, and read pages. \
Extract text before answering rather than guessing page contents. When you \
have what you need, answer the user directly and concisely without requesting \
further actions. If an action fails, read the error and try a different \
approach.";

/// Build a ready session over a freshly launched browser.
///
/// Fails fast before the first loop iteration when the oracle credential is
/// missing or the browser cannot start.
pub(crate) async fn build_session(
    config: &AppConfig,
    headed: bool,
) -> Result<(Session, Arc<ChromiumDriver>), Box<dyn std::error::Error>> {
    let oracle = create_oracle(config)?;

    let mut browser_config = config.browser.clone();
    if headed {
        browser_config.headless = false;
    }
    let driver = Arc::new(ChromiumDriver::launch(&browser_config).await?);
    let catalog = Arc::new(default_catalog(driver.clone(), &browser_config));

    let instruction = config
        .agent
        .instruction_override
        .clone()
        .unwrap_or_else(|| DEFAULT_INSTRUCTION.to_string());

    let session = Session::new(
        oracle,
        &config.default_model,
        instruction,
        catalog,
        Arc::new(EventBus::default()),
    )
    .with_max_messages(config.agent.max_messages)
    .with_max_iterations(config.agent.max_iterations)
    .with_oracle_timeout(Duration::from_secs(config.agent.oracle_timeout_secs))
    .with_temperature(config.default_temperature)
    .with_max_tokens(config.default_max_tokens);

    Ok((session, driver))
}
