//! Turn domain types — the immutable records that make up a conversation.
//!
//! These are the core value objects that flow through the entire system:
//! the user submits a message → the session consults the oracle → requested
//! actions are dispatched → results come back as turns → repeat until the
//! oracle answers without requesting anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an agent session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The standing instruction — survives history trimming
    Instruction,
    /// The end user
    User,
    /// The reasoning oracle
    Assistant,
    /// The outcome of one dispatched action
    ActionResult,
}

/// One action the oracle asked the dispatcher to run.
///
/// The `id` is an opaque correlation token minted by the oracle; the matching
/// [`ActionResult`] echoes it back so the oracle can pair results with requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub id: String,

    /// Name of the catalog entry to invoke
    pub name: String,

    /// Arguments as a JSON value, validated against the entry's schema
    /// before dispatch
    pub arguments: serde_json::Value,
}

/// The outcome of dispatching one [`ActionRequest`].
///
/// Dispatch never lets a failure escape: every invocation ends in either
/// `Ok(text)` or `Err(text)`, tagged with the originating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    /// The request id this result answers
    pub request_id: String,

    /// Name of the action that ran (or failed to resolve)
    pub name: String,

    /// Success payload or failure text
    pub outcome: std::result::Result<String, String>,
}

impl ActionResult {
    pub fn ok(request_id: impl Into<String>, name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            name: name.into(),
            outcome: Ok(output.into()),
        }
    }

    pub fn err(request_id: impl Into<String>, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            name: name.into(),
            outcome: Err(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// A single immutable entry in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Unique turn ID
    pub id: String,

    /// Who produced this turn
    pub role: Role,

    /// The text content. May be empty for an assistant turn that only
    /// requests actions.
    pub content: String,

    /// Actions requested by the oracle (assistant turns only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<ActionRequest>,

    /// The dispatched outcome this turn carries (action-result turns only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ActionResult>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    fn base(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            requests: Vec::new(),
            result: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a standing-instruction turn.
    pub fn instruction(content: impl Into<String>) -> Self {
        Self::base(Role::Instruction, content)
    }

    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::base(Role::User, content)
    }

    /// Create an assistant turn, optionally carrying action requests.
    pub fn assistant(content: impl Into<String>, requests: Vec<ActionRequest>) -> Self {
        Self {
            requests,
            ..Self::base(Role::Assistant, content)
        }
    }

    /// Create an action-result turn. The content is what the oracle sees;
    /// failures are prefixed by the session so the oracle can tell them apart.
    pub fn action_result(content: impl Into<String>, result: ActionResult) -> Self {
        Self {
            result: Some(result),
            ..Self::base(Role::ActionResult, content)
        }
    }

    pub fn is_instruction(&self) -> bool {
        self.role == Role::Instruction
    }
}
