//! Agent event sink — structured observability for the session loop.
//!
//! Events are published when something interesting happens: a session starts,
//! the oracle is consulted, an action is dispatched. Subscribers (reporters,
//! test probes) react without coupling into the loop; publishing to a bus
//! with no subscribers is fine and never affects control flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All agent events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgentEvent {
    /// A session came up with its standing instruction seeded
    SessionStarted {
        session_id: String,
        timestamp: DateTime<Utc>,
    },

    /// The oracle returned one assistant turn
    OracleConsulted {
        session_id: String,
        model: String,
        iteration: u32,
        requested_actions: usize,
        tokens_used: u32,
        timestamp: DateTime<Utc>,
    },

    /// One action request was dispatched
    ActionDispatched {
        action: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The session produced a final answer
    AnswerProduced {
        session_id: String,
        iterations: u32,
        timestamp: DateTime<Utc>,
    },

    /// The iteration budget ran out before a final answer
    BudgetExceeded {
        session_id: String,
        iterations: u32,
        timestamp: DateTime<Utc>,
    },

    /// An error occurred
    ErrorOccurred {
        context: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for agent events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<AgentEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: AgentEvent) {
        // Ignore send errors (no subscribers = that's fine)
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<AgentEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(AgentEvent::ActionDispatched {
            action: "navigate".into(),
            success: true,
            duration_ms: 42,
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            AgentEvent::ActionDispatched { action, success, .. } => {
                assert_eq!(action, "navigate");
                assert!(success);
            }
            _ => panic!("Expected ActionDispatched event"),
        }
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        // Publishing with no subscribers should not panic
        bus.publish(AgentEvent::ErrorOccurred {
            context: "test".into(),
            error_message: "no subscribers".into(),
            timestamp: Utc::now(),
        });
    }
}
