//! Oracle trait — the abstraction over the reasoning engine.
//!
//! An Oracle maps (standing instruction, bounded history, action catalog
//! schemas) to one assistant turn: either a final textual answer or a list
//! of requested actions. The session loop calls `consult()` without knowing
//! which backend is being used — pure polymorphism.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::action::ActionDefinition;
use crate::error::OracleError;
use crate::turn::{ActionRequest, Turn};

/// One consultation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleRequest {
    /// The model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,

    /// The standing instruction text
    pub instruction: String,

    /// The bounded history snapshot, instruction turns excluded — the
    /// instruction travels as its own field
    pub turns: Vec<Turn>,

    /// Actions the oracle may request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionDefinition>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

/// One assistant turn's worth of oracle output.
///
/// An empty `requests` list means `content` is the final answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleReply {
    /// The text content (final answer, or commentary alongside requests)
    pub content: String,

    /// Actions the oracle wants dispatched, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<ActionRequest>,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Oracle trait.
#[async_trait]
pub trait Oracle: Send + Sync + std::fmt::Debug {
    /// A human-readable name for this oracle backend (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send one consultation and get the next assistant turn.
    async fn consult(&self, request: OracleRequest) -> std::result::Result<OracleReply, OracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_with_no_requests_is_final() {
        let reply = OracleReply {
            content: "The answer is 42.".into(),
            requests: vec![],
            usage: None,
        };
        assert!(reply.requests.is_empty());
        let json = serde_json::to_string(&reply).unwrap();
        // Empty requests are omitted on the wire
        assert!(!json.contains("requests"));
    }

    #[test]
    fn request_serialization() {
        let req = OracleRequest {
            model: "claude-sonnet-4-20250514".into(),
            instruction: "You drive a browser.".into(),
            turns: vec![Turn::user("open example.com")],
            actions: vec![],
            temperature: 0.0,
            max_tokens: Some(1024),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("You drive a browser."));
        assert!(json.contains("open example.com"));
    }
}
