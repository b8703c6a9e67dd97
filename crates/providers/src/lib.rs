//! Reasoning oracle backends for webpilot.
//!
//! One backend today: the Anthropic Messages API. The session loop only
//! sees the `Oracle` trait from core.

pub mod anthropic;

use std::sync::Arc;

use webpilot_config::AppConfig;
use webpilot_core::{Oracle, OracleError};

pub use anthropic::AnthropicOracle;

/// Build the configured oracle, failing fast when no credential is present.
///
/// A missing API key is a configuration failure: it surfaces before any
/// loop iteration, not mid-session.
pub fn create_oracle(config: &AppConfig) -> Result<Arc<dyn Oracle>, OracleError> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        OracleError::NotConfigured(
            "no API key found; set WEBPILOT_API_KEY or ANTHROPIC_API_KEY, or add api_key to config.toml".into(),
        )
    })?;

    Ok(Arc::new(AnthropicOracle::new(api_key)))
}
