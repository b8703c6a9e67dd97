//! Action dispatch — one assistant turn's requests, one result each.
//!
//! The dispatcher never fails as a whole: unknown names, rejected arguments,
//! raised errors, and timeouts all become an `Err(text)` outcome on the
//! matching result, and one request's failure never stops its siblings.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use webpilot_core::error::ActionError;
use webpilot_core::event::{AgentEvent, EventBus};
use webpilot_core::turn::{ActionRequest, ActionResult};
use webpilot_core::ActionCatalog;

pub struct Dispatcher {
    catalog: Arc<ActionCatalog>,
    events: Arc<EventBus>,
}

impl Dispatcher {
    pub fn new(catalog: Arc<ActionCatalog>, events: Arc<EventBus>) -> Self {
        Self { catalog, events }
    }

    /// Execute each request sequentially, producing one result per request
    /// in request order. Results correlate back to requests by id.
    pub async fn dispatch(&self, requests: &[ActionRequest]) -> Vec<ActionResult> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let start = Instant::now();
            let outcome = self.run_one(request).await;
            let duration_ms = start.elapsed().as_millis() as u64;
            let success = outcome.is_ok();

            if let Err(message) = &outcome {
                warn!(action = %request.name, %message, "Action dispatch failed");
            } else {
                debug!(action = %request.name, duration_ms, "Action dispatched");
            }

            self.events.publish(AgentEvent::ActionDispatched {
                action: request.name.clone(),
                success,
                duration_ms,
                timestamp: Utc::now(),
            });

            results.push(ActionResult {
                request_id: request.id.clone(),
                name: request.name.clone(),
                outcome,
            });
        }

        results
    }

    /// Resolve, validate, and invoke a single request.
    ///
    /// Schema rejections and runtime failures both collapse into the failure
    /// text the oracle sees; it reacts to the message, not the kind.
    async fn run_one(&self, request: &ActionRequest) -> Result<String, String> {
        let Some(action) = self.catalog.get(&request.name) else {
            return Err(ActionError::NotFound(request.name.clone()).to_string());
        };

        let arguments = action
            .schema()
            .validate(&request.arguments)
            .map_err(|msg| ActionError::InvalidArguments(msg).to_string())?;

        let timeout = action.timeout();
        match tokio::time::timeout(timeout, action.invoke(arguments)).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(ActionError::Timeout {
                action: request.name.clone(),
                timeout_secs: timeout.as_secs(),
            }
            .to_string()),
        }
    }
}
