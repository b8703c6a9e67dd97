//! Error types for the webpilot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all webpilot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Oracle (reasoning engine) errors ---
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    // --- Action errors ---
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The session's iteration budget ran out before the oracle produced a
    /// final answer. Surfaced as its own variant so callers can tell it apart
    /// from a truncated answer.
    #[error("Iteration budget exceeded after {iterations} oracle consultations")]
    BudgetExceeded { iterations: u32 },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum OracleError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by oracle, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Oracle not configured: {0}")]
    NotConfigured(String),

    #[error("Consultation timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("unknown action: {0}")]
    NotFound(String),

    #[error("Invalid action arguments: {0}")]
    InvalidArguments(String),

    #[error("Action failed: {action} — {reason}")]
    ExecutionFailed { action: String, reason: String },

    #[error("Action timed out: {action} after {timeout_secs}s")]
    Timeout { action: String, timeout_secs: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_error_displays_correctly() {
        let err = Error::Oracle(OracleError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn unknown_action_message_is_stable() {
        // The dispatcher surfaces this text verbatim to the oracle.
        let err = ActionError::NotFound("teleport".into());
        assert_eq!(err.to_string(), "unknown action: teleport");
    }

    #[test]
    fn budget_exceeded_names_iteration_count() {
        let err = Error::BudgetExceeded { iterations: 25 };
        assert!(err.to_string().contains("25"));
    }
}
