//! Shared mocks for dispatcher and session tests.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Mutex;
use std::time::Duration;

use webpilot_core::action::{Action, ActionSchema, ParamKind, ParamSpec};
use webpilot_core::error::{ActionError, OracleError};
use webpilot_core::oracle::{Oracle, OracleReply, OracleRequest};

/// Echoes its `text` argument back.
pub(crate) struct EchoAction;

#[async_trait]
impl Action for EchoAction {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Echoes back the input"
    }
    fn schema(&self) -> ActionSchema {
        ActionSchema::new().param(ParamSpec::required("text", ParamKind::String, "Text to echo"))
    }
    async fn invoke(&self, arguments: Map<String, Value>) -> Result<String, ActionError> {
        Ok(arguments["text"].as_str().unwrap_or("").to_string())
    }
}

/// Always fails at invocation time.
pub(crate) struct FailingAction;

#[async_trait]
impl Action for FailingAction {
    fn name(&self) -> &str {
        "fail"
    }
    fn description(&self) -> &str {
        "Always fails"
    }
    fn schema(&self) -> ActionSchema {
        ActionSchema::new()
    }
    async fn invoke(&self, _arguments: Map<String, Value>) -> Result<String, ActionError> {
        Err(ActionError::ExecutionFailed {
            action: "fail".into(),
            reason: "element detached from document".into(),
        })
    }
}

/// Sleeps past its own declared timeout.
pub(crate) struct SlowAction;

#[async_trait]
impl Action for SlowAction {
    fn name(&self) -> &str {
        "slow"
    }
    fn description(&self) -> &str {
        "Never finishes in time"
    }
    fn schema(&self) -> ActionSchema {
        ActionSchema::new()
    }
    fn timeout(&self) -> Duration {
        Duration::from_millis(20)
    }
    async fn invoke(&self, _arguments: Map<String, Value>) -> Result<String, ActionError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok("too late".into())
    }
}

/// Replays a scripted sequence of replies and records every request it saw.
#[derive(Debug)]
pub(crate) struct ScriptedOracle {
    replies: Mutex<Vec<OracleReply>>,
    pub seen: Mutex<Vec<OracleRequest>>,
}

impl ScriptedOracle {
    pub fn new(mut replies: Vec<OracleReply>) -> Self {
        // Pop from the back
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn answer(content: &str) -> OracleReply {
        OracleReply {
            content: content.into(),
            requests: vec![],
            usage: None,
        }
    }

    pub fn acting(content: &str, requests: Vec<webpilot_core::ActionRequest>) -> OracleReply {
        OracleReply {
            content: content.into(),
            requests,
            usage: None,
        }
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn consult(&self, request: OracleRequest) -> Result<OracleReply, OracleError> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| OracleError::Network("script exhausted".into()))
    }
}

/// Never answers; used to exercise the consultation deadline.
#[derive(Debug)]
pub(crate) struct HangingOracle;

#[async_trait]
impl Oracle for HangingOracle {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn consult(&self, _request: OracleRequest) -> Result<OracleReply, OracleError> {
        std::future::pending().await
    }
}
