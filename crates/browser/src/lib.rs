//! Browser glue for webpilot.
//!
//! Actions give the oracle the ability to act on a real page: navigate,
//! click, type, and extract text. The Chromium connection lives behind the
//! [`PageDriver`] trait so the actions (and their tests) never touch the
//! DevTools protocol directly.

pub mod actions;
pub mod driver;

use std::sync::Arc;

use webpilot_config::BrowserConfig;
use webpilot_core::ActionCatalog;

pub use driver::{BrowserError, ChromiumDriver, PageDriver, PageInfo};

/// Create the default action catalog over the given driver.
pub fn default_catalog(driver: Arc<dyn PageDriver>, config: &BrowserConfig) -> ActionCatalog {
    let timeout = std::time::Duration::from_secs(config.action_timeout_secs);
    let max_chars = config.max_output_chars;

    let mut catalog = ActionCatalog::new();
    catalog.register(Box::new(actions::navigate::NavigateAction::new(driver.clone(), timeout)));
    catalog.register(Box::new(actions::click::ClickAction::new(driver.clone(), timeout)));
    catalog.register(Box::new(actions::type_text::TypeTextAction::new(driver.clone(), timeout)));
    catalog.register(Box::new(actions::extract_text::ExtractTextAction::new(
        driver.clone(),
        timeout,
        max_chars,
    )));
    catalog.register(Box::new(actions::page_info::PageInfoAction::new(driver, timeout)));
    catalog
}
