//! Action trait — the abstraction over the agent's browser capabilities.
//!
//! Actions are what let the agent act on the page: navigate, click, type,
//! extract text. Each one declares a typed parameter schema; the dispatcher
//! validates and coerces raw oracle arguments against it before invoking.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::ActionError;

/// The type of a single declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamKind {
    fn json_type(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
        }
    }
}

/// One named, typed, optionally-defaulted parameter of an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,

    /// Applied when the argument is absent and the parameter is optional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    pub description: String,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, kind: ParamKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            description: description.into(),
        }
    }

    pub fn optional(
        name: impl Into<String>,
        kind: ParamKind,
        default: Value,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: Some(default),
            description: description.into(),
        }
    }
}

/// A tagged description of an action's parameters.
///
/// Validation happens once, at the dispatcher boundary: raw oracle arguments
/// come in as loose JSON and leave as a coerced, defaulted map or a rejection
/// message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionSchema {
    pub params: Vec<ParamSpec>,
}

impl ActionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Validate and coerce raw arguments.
    ///
    /// Missing optional parameters take their default; missing required ones
    /// and type mismatches reject with a message. Unknown keys are dropped.
    pub fn validate(&self, arguments: &Value) -> std::result::Result<Map<String, Value>, String> {
        let empty = Map::new();
        let given = match arguments {
            Value::Object(map) => map,
            // Oracles occasionally send no arguments at all
            Value::Null => &empty,
            other => return Err(format!("arguments must be an object, got {other}")),
        };

        let mut validated = Map::new();
        for spec in &self.params {
            match given.get(&spec.name) {
                Some(value) => {
                    let coerced = Self::coerce(value, spec.kind)
                        .map_err(|expected| {
                            format!("argument '{}' must be of type {expected}", spec.name)
                        })?;
                    validated.insert(spec.name.clone(), coerced);
                }
                None if spec.required => {
                    return Err(format!("missing required argument '{}'", spec.name));
                }
                None => {
                    if let Some(default) = &spec.default {
                        validated.insert(spec.name.clone(), default.clone());
                    }
                }
            }
        }
        Ok(validated)
    }

    /// Coerce a value to the declared kind. Stringified numbers and booleans
    /// are accepted — oracles routinely emit them.
    fn coerce(value: &Value, kind: ParamKind) -> std::result::Result<Value, &'static str> {
        match kind {
            ParamKind::String => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err("string"),
            },
            ParamKind::Integer => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
                Value::String(s) => s
                    .parse::<i64>()
                    .map(|n| Value::Number(n.into()))
                    .map_err(|_| "integer"),
                _ => Err("integer"),
            },
            ParamKind::Number => match value {
                Value::Number(_) => Ok(value.clone()),
                Value::String(s) => s
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or("number"),
                _ => Err("number"),
            },
            ParamKind::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                Value::String(s) => match s.as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    _ => Err("boolean"),
                },
                _ => Err("boolean"),
            },
        }
    }

    /// Render as a JSON Schema object for the oracle.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for spec in &self.params {
            let mut prop = Map::new();
            prop.insert("type".into(), spec.kind.json_type().into());
            prop.insert("description".into(), spec.description.clone().into());
            if let Some(default) = &spec.default {
                prop.insert("default".into(), default.clone());
            }
            properties.insert(spec.name.clone(), Value::Object(prop));
            if spec.required {
                required.push(Value::String(spec.name.clone()));
            }
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// An action definition sent to the oracle so it knows what it can request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,
    pub description: String,

    /// JSON Schema describing the action's parameters
    pub parameters: Value,
}

/// The core Action trait.
///
/// Each browser capability (navigate, click, type_text, extract_text, …)
/// implements this trait. Actions are registered in the ActionCatalog and
/// offered to the oracle by the session loop.
#[async_trait]
pub trait Action: Send + Sync {
    /// The unique name of this action (e.g., "navigate", "click").
    fn name(&self) -> &str;

    /// A description of what this action does (sent to the oracle).
    fn description(&self) -> &str;

    /// The declared parameter schema.
    fn schema(&self) -> ActionSchema;

    /// Bounded wait for one invocation. The dispatcher turns an elapsed
    /// timeout into an `Err` result, not a process-level fault.
    fn timeout(&self) -> Duration {
        Duration::from_secs(30)
    }

    /// Run the action with validated, coerced arguments. Success payloads
    /// are text, pre-formatted and pre-truncated by the action itself.
    async fn invoke(&self, arguments: Map<String, Value>) -> std::result::Result<String, ActionError>;

    /// Convert this action into an ActionDefinition for the oracle.
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.schema().to_json_schema(),
        }
    }
}

/// A registry of available actions.
///
/// The session uses this to:
/// 1. Get action definitions to send to the oracle
/// 2. Look up and execute actions when the oracle requests them
pub struct ActionCatalog {
    actions: HashMap<String, Box<dyn Action>>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Register an action. Replaces any existing action with the same name.
    pub fn register(&mut self, action: Box<dyn Action>) {
        let name = action.name().to_string();
        self.actions.insert(name, action);
    }

    /// Get an action by name.
    pub fn get(&self, name: &str) -> Option<&dyn Action> {
        self.actions.get(name).map(|a| a.as_ref())
    }

    /// Get all action definitions (for sending to the oracle).
    pub fn definitions(&self) -> Vec<ActionDefinition> {
        self.actions.values().map(|a| a.definition()).collect()
    }

    /// List all registered action names.
    pub fn names(&self) -> Vec<&str> {
        self.actions.keys().map(|s| s.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::new()
    }
}
