//! The session loop — alternating oracle consultation and action dispatch.
//!
//! One session owns one bounded history. A user message enters, the oracle
//! is consulted, requested actions are dispatched, results go back into the
//! history, and the cycle repeats until the oracle answers without
//! requesting anything. Oracle failures and an exhausted iteration budget
//! end the cycle as session-level errors; action failures never do.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use webpilot_core::error::{Error, OracleError, Result};
use webpilot_core::event::{AgentEvent, EventBus};
use webpilot_core::history::History;
use webpilot_core::oracle::{Oracle, OracleRequest};
use webpilot_core::turn::{SessionId, Turn};
use webpilot_core::ActionCatalog;

use crate::dispatcher::Dispatcher;

/// Where the session currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Between user turns
    AwaitingUserInput,
    /// Waiting on the oracle
    ConsultingOracle,
    /// Running requested actions
    DispatchingActions,
    /// The last user turn ended with a final answer
    Done,
    /// The last user turn ran out of iteration budget
    BudgetExceeded,
}

/// One conversational agent session.
///
/// The history is owned exclusively here; all mutation goes through
/// `&mut self`. Sessions are reentrant: after `Done` (or `BudgetExceeded`)
/// the next [`handle`](Session::handle) call starts a fresh cycle on the
/// same history.
pub struct Session {
    id: SessionId,
    oracle: Arc<dyn Oracle>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    instruction: String,
    catalog: Arc<ActionCatalog>,
    dispatcher: Dispatcher,
    history: History,
    events: Arc<EventBus>,
    state: SessionState,

    /// Oracle consultations allowed per user turn. Zero = unbounded.
    max_iterations: u32,

    /// Deadline for one oracle consultation.
    oracle_timeout: Duration,
}

impl Session {
    /// Create a new session. Seeds the history with the standing
    /// instruction when one is given.
    pub fn new(
        oracle: Arc<dyn Oracle>,
        model: impl Into<String>,
        instruction: impl Into<String>,
        catalog: Arc<ActionCatalog>,
        events: Arc<EventBus>,
    ) -> Self {
        let id = SessionId::new();
        let instruction = instruction.into();
        let mut history = History::new(50);
        if !instruction.is_empty() {
            history.append(vec![Turn::instruction(&instruction)]);
        }

        events.publish(AgentEvent::SessionStarted {
            session_id: id.to_string(),
            timestamp: Utc::now(),
        });

        Self {
            id,
            oracle,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            instruction,
            dispatcher: Dispatcher::new(catalog.clone(), events.clone()),
            catalog,
            history,
            events,
            state: SessionState::AwaitingUserInput,
            max_iterations: 25,
            oracle_timeout: Duration::from_secs(120),
        }
    }

    /// Set the history retention cap M (non-instruction turns kept).
    pub fn with_max_messages(mut self, max: usize) -> Self {
        let mut history = History::new(max);
        history.append(self.history.snapshot());
        self.history = history;
        self
    }

    /// Set the per-user-turn iteration budget. Zero disables the budget.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the deadline for one oracle consultation.
    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max tokens per oracle response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Process one user message and drive the cycle to a final answer.
    ///
    /// Returns the oracle's answer verbatim, or a session-level error:
    /// oracle failures (including the consultation deadline) and an
    /// exhausted iteration budget propagate; action failures are absorbed
    /// into the conversation for the oracle to react to.
    pub async fn handle(&mut self, user_message: impl Into<String>) -> Result<String> {
        self.state = SessionState::AwaitingUserInput;
        let user_message = user_message.into();
        info!(session_id = %self.id, "Processing user message");

        self.history.append(vec![Turn::user(user_message)]);
        let definitions = self.catalog.definitions();
        let mut iteration: u32 = 0;

        loop {
            if self.max_iterations > 0 && iteration >= self.max_iterations {
                self.state = SessionState::BudgetExceeded;
                warn!(
                    session_id = %self.id,
                    iterations = iteration,
                    "Iteration budget exceeded without a final answer"
                );
                self.events.publish(AgentEvent::BudgetExceeded {
                    session_id: self.id.to_string(),
                    iterations: iteration,
                    timestamp: Utc::now(),
                });
                return Err(Error::BudgetExceeded { iterations: iteration });
            }
            iteration += 1;

            self.state = SessionState::ConsultingOracle;
            let reply = self.consult(&definitions, iteration).await?;

            let requests = reply.requests.clone();
            self.history
                .append(vec![Turn::assistant(reply.content.clone(), reply.requests)]);

            if requests.is_empty() {
                // No requested actions — the content is the final answer.
                self.state = SessionState::Done;
                self.events.publish(AgentEvent::AnswerProduced {
                    session_id: self.id.to_string(),
                    iterations: iteration,
                    timestamp: Utc::now(),
                });
                return Ok(reply.content);
            }

            self.state = SessionState::DispatchingActions;
            debug!(count = requests.len(), "Dispatching requested actions");
            let results = self.dispatcher.dispatch(&requests).await;

            // One batch, one eviction pass.
            let result_turns: Vec<Turn> = results
                .into_iter()
                .map(|result| {
                    let content = match &result.outcome {
                        Ok(text) => text.clone(),
                        // Prefix failures so the oracle can see they failed
                        Err(message) => format!("Error: {message}"),
                    };
                    Turn::action_result(content, result)
                })
                .collect();
            self.history.append(result_turns);
        }
    }

    /// One oracle consultation under the configured deadline.
    async fn consult(
        &self,
        definitions: &[webpilot_core::ActionDefinition],
        iteration: u32,
    ) -> Result<webpilot_core::OracleReply> {
        let turns = self
            .history
            .snapshot()
            .into_iter()
            .filter(|t| !t.is_instruction())
            .collect();

        let request = OracleRequest {
            model: self.model.clone(),
            instruction: self.instruction.clone(),
            turns,
            actions: definitions.to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let reply = match tokio::time::timeout(self.oracle_timeout, self.oracle.consult(request)).await {
            Ok(result) => result.map_err(Error::from)?,
            Err(_) => {
                let message = format!(
                    "oracle did not answer within {}s",
                    self.oracle_timeout.as_secs()
                );
                self.events.publish(AgentEvent::ErrorOccurred {
                    context: "oracle consultation".into(),
                    error_message: message.clone(),
                    timestamp: Utc::now(),
                });
                return Err(OracleError::Timeout(message).into());
            }
        };

        self.events.publish(AgentEvent::OracleConsulted {
            session_id: self.id.to_string(),
            model: self.model.clone(),
            iteration,
            requested_actions: reply.requests.len(),
            tokens_used: reply.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0),
            timestamp: Utc::now(),
        });

        Ok(reply)
    }
}
