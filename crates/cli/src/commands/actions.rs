//! `webpilot actions` — list the available browser actions.

use async_trait::async_trait;
use std::sync::Arc;

use webpilot_browser::{BrowserError, PageDriver, PageInfo, default_catalog};
use webpilot_config::AppConfig;

/// Catalog construction needs a driver, but listing never invokes one.
struct NullDriver;

#[async_trait]
impl PageDriver for NullDriver {
    async fn goto(&self, _url: &str) -> Result<String, BrowserError> {
        Err(BrowserError::Interaction("no browser attached".into()))
    }
    async fn click(&self, _selector: &str) -> Result<(), BrowserError> {
        Err(BrowserError::Interaction("no browser attached".into()))
    }
    async fn type_text(&self, _selector: &str, _text: &str, _press_enter: bool) -> Result<(), BrowserError> {
        Err(BrowserError::Interaction("no browser attached".into()))
    }
    async fn extract_text(&self, _selector: &str) -> Result<String, BrowserError> {
        Err(BrowserError::Interaction("no browser attached".into()))
    }
    async fn page_info(&self) -> Result<PageInfo, BrowserError> {
        Err(BrowserError::Interaction("no browser attached".into()))
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let catalog = default_catalog(Arc::new(NullDriver), &config.browser);

    let mut definitions = catalog.definitions();
    definitions.sort_by(|a, b| a.name.cmp(&b.name));

    println!("Available actions:");
    for def in definitions {
        println!("  {:<14} {}", def.name, def.description);
        let required = def.parameters["required"]
            .as_array()
            .map(|r| {
                r.iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        if !required.is_empty() {
            println!("  {:<14} required: {required}", "");
        }
    }
    Ok(())
}
