//! # Webpilot Core
//!
//! Domain types, traits, and error definitions for the webpilot browser agent.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod action;
pub mod error;
pub mod event;
pub mod history;
pub mod oracle;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use action::{Action, ActionCatalog, ActionDefinition, ActionSchema, ParamKind, ParamSpec};
pub use error::{ActionError, Error, OracleError, Result};
pub use event::{AgentEvent, EventBus};
pub use history::History;
pub use oracle::{Oracle, OracleReply, OracleRequest, Usage};
pub use turn::{ActionRequest, ActionResult, Role, SessionId, Turn};
