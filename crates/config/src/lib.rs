//! Configuration loading, validation, and management for webpilot.
//!
//! Loads configuration from `~/.webpilot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.webpilot/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Anthropic API key for the reasoning oracle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per oracle response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Session loop configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// Browser configuration
    #[serde(default)]
    pub browser: BrowserConfig,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}
fn default_temperature() -> f32 {
    0.0
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_true() -> bool {
    true
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("agent", &self.agent)
            .field("browser", &self.browser)
            .finish()
    }
}

/// Session loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// History retention cap M: non-instruction turns kept after each append
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Oracle consultations allowed per user turn. Zero = unbounded.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Deadline for one oracle consultation
    #[serde(default = "default_oracle_timeout")]
    pub oracle_timeout_secs: u64,

    /// Override the standing instruction entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_override: Option<String>,
}

fn default_max_messages() -> usize {
    50
}
fn default_max_iterations() -> u32 {
    25
}
fn default_oracle_timeout() -> u64 {
    120
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            max_iterations: default_max_iterations(),
            oracle_timeout_secs: default_oracle_timeout(),
            instruction_override: None,
        }
    }
}

/// Browser driver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run Chromium headless
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Path to the Chromium/Chrome executable; autodetected when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// Bounded wait for page navigation and readiness
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// Bounded wait for one action invocation
    #[serde(default = "default_action_timeout")]
    pub action_timeout_secs: u64,

    /// Extracted page text is truncated to this many characters before it
    /// reaches the oracle
    #[serde(default = "default_max_output_chars")]
    pub max_output_chars: usize,
}

fn default_navigation_timeout() -> u64 {
    20
}
fn default_action_timeout() -> u64 {
    30
}
fn default_max_output_chars() -> usize {
    4000
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            navigation_timeout_secs: default_navigation_timeout(),
            action_timeout_secs: default_action_timeout(),
            max_output_chars: default_max_output_chars(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.webpilot/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `WEBPILOT_API_KEY` (highest priority)
    /// - `ANTHROPIC_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("WEBPILOT_API_KEY")
                .ok()
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("WEBPILOT_MODEL") {
            config.default_model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".webpilot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.oracle_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "agent.oracle_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.browser.max_output_chars == 0 {
            return Err(ConfigError::ValidationError(
                "browser.max_output_chars must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            agent: AgentConfig::default(),
            browser: BrowserConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
