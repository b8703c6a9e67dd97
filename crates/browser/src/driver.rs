//! Chromium page driver.
//!
//! One headless Chromium, one page, driven over the DevTools protocol via
//! `chromiumoxide`. All page operations go through a single async lock: the
//! page is shared by every action in the catalog, and serializing access here
//! keeps the dispatcher free of any locking.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use webpilot_config::BrowserConfig;

/// Errors raised by the browser driver. Actions absorb these into failure
/// text; they never cross the dispatcher boundary as errors of their own.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("No element matched selector '{selector}'")]
    ElementNotFound { selector: String },

    #[error("Page interaction failed: {0}")]
    Interaction(String),

    #[error("Timed out waiting for page after {0:?}")]
    Timeout(Duration),
}

/// Current URL and title of the driven page.
#[derive(Debug, Clone)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
}

/// The seam between the action catalog and the real browser.
///
/// Tests substitute a scripted implementation; production uses
/// [`ChromiumDriver`].
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to a URL and wait for the page to settle. Returns the title
    /// of the loaded page.
    async fn goto(&self, url: &str) -> Result<String, BrowserError>;

    /// Click the first element matching a CSS selector.
    async fn click(&self, selector: &str) -> Result<(), BrowserError>;

    /// Focus the first element matching a CSS selector and type into it,
    /// optionally pressing Enter afterwards.
    async fn type_text(&self, selector: &str, text: &str, press_enter: bool) -> Result<(), BrowserError>;

    /// Extract the visible text of the first element matching a CSS selector.
    async fn extract_text(&self, selector: &str) -> Result<String, BrowserError>;

    /// Current URL and title.
    async fn page_info(&self) -> Result<PageInfo, BrowserError>;
}

/// Production driver over a launched Chromium instance.
pub struct ChromiumDriver {
    browser: Mutex<Browser>,
    page: Page,
    /// Serializes page operations across concurrently-held action handles
    op_lock: Mutex<()>,
    navigation_timeout: Duration,
    handler_task: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page.
    pub async fn launch(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let mut builder = ChromeConfig::builder();
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.executable {
            builder = builder.chrome_executable(path);
        }
        let chrome_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler stream must be polled for the browser connection to
        // make progress.
        let handler_task = tokio::task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!(error = %e, "Browser handler stream closed");
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        info!(headless = config.headless, "Browser launched");

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            op_lock: Mutex::new(()),
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            handler_task,
        })
    }

    /// Close the browser and stop the handler task.
    pub async fn close(&self) {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            warn!(error = %e, "Browser did not close cleanly");
        }
        self.handler_task.abort();
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, BrowserError>>,
    ) -> Result<T, BrowserError> {
        tokio::time::timeout(self.navigation_timeout, fut)
            .await
            .map_err(|_| BrowserError::Timeout(self.navigation_timeout))?
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn goto(&self, url: &str) -> Result<String, BrowserError> {
        let _guard = self.op_lock.lock().await;
        debug!(url, "Navigating");
        self.bounded(async {
            self.page
                .goto(url)
                .await
                .map_err(|e| BrowserError::Navigation(e.to_string()))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| BrowserError::Navigation(e.to_string()))?;
            Ok(())
        })
        .await?;

        let title = self
            .page
            .get_title()
            .await
            .map_err(|e| BrowserError::Interaction(e.to_string()))?
            .unwrap_or_default();
        Ok(title)
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        let _guard = self.op_lock.lock().await;
        debug!(selector, "Clicking");
        self.bounded(async {
            let element = self
                .page
                .find_element(selector)
                .await
                .map_err(|_| BrowserError::ElementNotFound {
                    selector: selector.to_string(),
                })?;
            element
                .click()
                .await
                .map_err(|e| BrowserError::Interaction(e.to_string()))?;
            Ok(())
        })
        .await
    }

    async fn type_text(&self, selector: &str, text: &str, press_enter: bool) -> Result<(), BrowserError> {
        let _guard = self.op_lock.lock().await;
        debug!(selector, press_enter, "Typing");
        self.bounded(async {
            let element = self
                .page
                .find_element(selector)
                .await
                .map_err(|_| BrowserError::ElementNotFound {
                    selector: selector.to_string(),
                })?;
            element
                .click()
                .await
                .map_err(|e| BrowserError::Interaction(e.to_string()))?;
            element
                .type_str(text)
                .await
                .map_err(|e| BrowserError::Interaction(e.to_string()))?;
            if press_enter {
                element
                    .press_key("Enter")
                    .await
                    .map_err(|e| BrowserError::Interaction(e.to_string()))?;
            }
            Ok(())
        })
        .await
    }

    async fn extract_text(&self, selector: &str) -> Result<String, BrowserError> {
        let _guard = self.op_lock.lock().await;
        self.bounded(async {
            let element = self
                .page
                .find_element(selector)
                .await
                .map_err(|_| BrowserError::ElementNotFound {
                    selector: selector.to_string(),
                })?;
            let text = element
                .inner_text()
                .await
                .map_err(|e| BrowserError::Interaction(e.to_string()))?
                .unwrap_or_default();
            Ok(text)
        })
        .await
    }

    async fn page_info(&self) -> Result<PageInfo, BrowserError> {
        let _guard = self.op_lock.lock().await;
        let url = self
            .page
            .url()
            .await
            .map_err(|e| BrowserError::Interaction(e.to_string()))?
            .unwrap_or_default();
        let title = self
            .page
            .get_title()
            .await
            .map_err(|e| BrowserError::Interaction(e.to_string()))?
            .unwrap_or_default();
        Ok(PageInfo { url, title })
    }
}
