//! The webpilot session loop.
//!
//! Two pieces live here:
//! - [`Dispatcher`] — runs one assistant turn's action requests against the
//!   catalog and turns every outcome into a result, failures included.
//! - [`Session`] — the state machine that alternates oracle consultation and
//!   dispatch until the oracle answers without requesting actions.

pub mod dispatcher;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatcher::Dispatcher;
pub use session::{Session, SessionState};
