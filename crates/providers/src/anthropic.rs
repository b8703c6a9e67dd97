//! Anthropic oracle implementation.
//!
//! Uses Anthropic's Messages API directly:
//! - `x-api-key` header authentication (not Bearer)
//! - `anthropic-version` header
//! - Standing instruction as top-level `system` field
//! - Native tool use with `tool_use` / `tool_result` content blocks

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use webpilot_core::oracle::{Oracle, OracleReply, OracleRequest, Usage};
use webpilot_core::turn::{ActionRequest, Role, Turn};
use webpilot_core::{ActionDefinition, OracleError};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic Messages API oracle.
#[derive(Debug)]
pub struct AnthropicOracle {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicOracle {
    /// Create a new Anthropic oracle.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "anthropic".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Reduce history turns to Anthropic message format with content blocks.
    ///
    /// Instruction turns travel as the top-level `system` field; any that
    /// slipped into the turn list are skipped here.
    fn to_api_messages(turns: &[Turn]) -> Vec<AnthropicMessage> {
        let mut result = Vec::new();

        for turn in turns {
            match turn.role {
                Role::User => {
                    result.push(AnthropicMessage {
                        role: "user".into(),
                        content: AnthropicContent::Text(turn.content.clone()),
                    });
                }
                Role::Assistant => {
                    if turn.requests.is_empty() {
                        result.push(AnthropicMessage {
                            role: "assistant".into(),
                            content: AnthropicContent::Text(turn.content.clone()),
                        });
                    } else {
                        let mut blocks: Vec<ContentBlock> = Vec::new();
                        if !turn.content.is_empty() {
                            blocks.push(ContentBlock::Text {
                                text: turn.content.clone(),
                            });
                        }
                        for request in &turn.requests {
                            blocks.push(ContentBlock::ToolUse {
                                id: request.id.clone(),
                                name: request.name.clone(),
                                input: request.arguments.clone(),
                            });
                        }
                        result.push(AnthropicMessage {
                            role: "assistant".into(),
                            content: AnthropicContent::Blocks(blocks),
                        });
                    }
                }
                Role::ActionResult => {
                    let request_id = turn
                        .result
                        .as_ref()
                        .map(|r| r.request_id.clone())
                        .unwrap_or_default();
                    result.push(AnthropicMessage {
                        role: "user".into(),
                        content: AnthropicContent::Blocks(vec![ContentBlock::ToolResult {
                            tool_use_id: request_id,
                            content: turn.content.clone(),
                        }]),
                    });
                }
                Role::Instruction => {} // handled as the system field
            }
        }

        result
    }

    /// Convert action definitions to Anthropic tool format.
    fn to_api_tools(actions: &[ActionDefinition]) -> Vec<AnthropicTool> {
        actions
            .iter()
            .map(|a| AnthropicTool {
                name: a.name.clone(),
                description: a.description.clone(),
                input_schema: a.parameters.clone(),
            })
            .collect()
    }

    /// Convert an Anthropic API response to an OracleReply.
    fn response_to_reply(resp: AnthropicResponse) -> Result<OracleReply, OracleError> {
        let mut content = String::new();
        let mut requests = Vec::new();

        for block in &resp.content {
            match block {
                ResponseContentBlock::Text { text } => {
                    if !content.is_empty() {
                        content.push('\n');
                    }
                    content.push_str(text);
                }
                ResponseContentBlock::ToolUse { id, name, input } => {
                    requests.push(ActionRequest {
                        id: id.clone(),
                        name: name.clone(),
                        arguments: input.clone(),
                    });
                }
            }
        }

        let usage = Some(Usage {
            prompt_tokens: resp.usage.input_tokens,
            completion_tokens: resp.usage.output_tokens,
            total_tokens: resp.usage.input_tokens + resp.usage.output_tokens,
        });

        Ok(OracleReply {
            content,
            requests,
            usage,
        })
    }
}

#[async_trait]
impl Oracle for AnthropicOracle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn consult(&self, request: OracleRequest) -> Result<OracleReply, OracleError> {
        let url = format!("{}/v1/messages", self.base_url);
        let api_messages = Self::to_api_messages(&request.turns);
        let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": api_messages,
            "max_tokens": max_tokens,
            "temperature": request.temperature,
        });

        if !request.instruction.is_empty() {
            body["system"] = serde_json::json!(request.instruction);
        }

        if !request.actions.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&request.actions));
        }

        debug!(oracle = "anthropic", model = %request.model, turns = request.turns.len(), "Sending consultation");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(e.to_string())
                } else {
                    OracleError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(OracleError::RateLimited { retry_after_secs: 5 });
        }
        if status == 401 || status == 403 {
            return Err(OracleError::AuthenticationFailed(
                "Invalid Anthropic API key".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Anthropic API error");
            return Err(OracleError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: AnthropicResponse = response.json().await.map_err(|e| OracleError::ApiError {
            status_code: 200,
            message: format!("Failed to parse Anthropic response: {e}"),
        })?;

        Self::response_to_reply(api_resp)
    }
}

// --- Anthropic API types ---

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: AnthropicContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum AnthropicContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(rename = "tool_result")]
    ToolResult { tool_use_id: String, content: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicTool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ResponseContentBlock>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ResponseContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use webpilot_core::turn::ActionResult;

    #[test]
    fn constructor() {
        let oracle = AnthropicOracle::new("sk-ant-test");
        assert_eq!(oracle.name(), "anthropic");
        assert_eq!(oracle.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn constructor_with_base_url() {
        let oracle = AnthropicOracle::new("sk-ant-test").with_base_url("https://custom.proxy.com/");
        assert_eq!(oracle.base_url, "https://custom.proxy.com");
    }

    #[test]
    fn turn_conversion_user_assistant() {
        let turns = vec![Turn::user("open example.com"), Turn::assistant("done", vec![])];
        let api_msgs = AnthropicOracle::to_api_messages(&turns);
        assert_eq!(api_msgs.len(), 2);
        assert_eq!(api_msgs[0].role, "user");
        assert_eq!(api_msgs[1].role, "assistant");
    }

    #[test]
    fn instruction_turns_are_skipped() {
        let turns = vec![Turn::instruction("system text"), Turn::user("hi")];
        let api_msgs = AnthropicOracle::to_api_messages(&turns);
        assert_eq!(api_msgs.len(), 1);
        assert_eq!(api_msgs[0].role, "user");
    }

    #[test]
    fn turn_conversion_with_requests() {
        let turn = Turn::assistant(
            "Let me open the page",
            vec![ActionRequest {
                id: "toolu_123".into(),
                name: "navigate".into(),
                arguments: serde_json::json!({"url": "https://example.com"}),
            }],
        );

        let api_msgs = AnthropicOracle::to_api_messages(&[turn]);
        assert_eq!(api_msgs.len(), 1);
        assert_eq!(api_msgs[0].role, "assistant");

        match &api_msgs[0].content {
            AnthropicContent::Blocks(blocks) => {
                assert_eq!(blocks.len(), 2); // text + tool_use
                match &blocks[1] {
                    ContentBlock::ToolUse { id, name, input } => {
                        assert_eq!(id, "toolu_123");
                        assert_eq!(name, "navigate");
                        assert_eq!(input["url"], "https://example.com");
                    }
                    _ => panic!("Expected tool_use block"),
                }
            }
            _ => panic!("Expected blocks content"),
        }
    }

    #[test]
    fn turn_conversion_action_result() {
        let turn = Turn::action_result(
            "page loaded",
            ActionResult::ok("toolu_123", "navigate", "page loaded"),
        );
        let api_msgs = AnthropicOracle::to_api_messages(&[turn]);
        assert_eq!(api_msgs.len(), 1);
        assert_eq!(api_msgs[0].role, "user"); // Tool results go as user messages

        match &api_msgs[0].content {
            AnthropicContent::Blocks(blocks) => match &blocks[0] {
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                } => {
                    assert_eq!(tool_use_id, "toolu_123");
                    assert_eq!(content, "page loaded");
                }
                _ => panic!("Expected tool_result block"),
            },
            _ => panic!("Expected blocks content"),
        }
    }

    #[test]
    fn action_definition_conversion() {
        let actions = vec![ActionDefinition {
            name: "click".into(),
            description: "Click an element".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "selector": {"type": "string"}
                },
                "required": ["selector"]
            }),
        }];
        let api_tools = AnthropicOracle::to_api_tools(&actions);
        assert_eq!(api_tools.len(), 1);
        assert_eq!(api_tools[0].name, "click");
        assert_eq!(api_tools[0].input_schema["type"].as_str(), Some("object"));
    }

    #[test]
    fn parse_text_response() {
        let resp: AnthropicResponse = serde_json::from_str(
            r#"{
                "id": "msg_01",
                "model": "claude-sonnet-4-20250514",
                "content": [{"type": "text", "text": "The page title is Example Domain."}],
                "usage": {"input_tokens": 10, "output_tokens": 5},
                "stop_reason": "end_turn"
            }"#,
        )
        .unwrap();

        let reply = AnthropicOracle::response_to_reply(resp).unwrap();
        assert_eq!(reply.content, "The page title is Example Domain.");
        assert!(reply.requests.is_empty());
        assert_eq!(reply.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn parse_tool_use_response() {
        let resp: AnthropicResponse = serde_json::from_str(
            r#"{
                "id": "msg_02",
                "model": "claude-sonnet-4-20250514",
                "content": [
                    {"type": "text", "text": "Opening the page"},
                    {"type": "tool_use", "id": "toolu_abc", "name": "navigate", "input": {"url": "https://example.com"}}
                ],
                "usage": {"input_tokens": 20, "output_tokens": 10},
                "stop_reason": "tool_use"
            }"#,
        )
        .unwrap();

        let reply = AnthropicOracle::response_to_reply(resp).unwrap();
        assert_eq!(reply.content, "Opening the page");
        assert_eq!(reply.requests.len(), 1);
        assert_eq!(reply.requests[0].name, "navigate");
        assert_eq!(reply.requests[0].id, "toolu_abc");
        assert_eq!(reply.requests[0].arguments["url"], "https://example.com");
    }

    #[test]
    fn anthropic_content_serialization() {
        let msg = AnthropicMessage {
            role: "user".into(),
            content: AnthropicContent::Text("Hello".into()),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"Hello\""));

        let msg2 = AnthropicMessage {
            role: "assistant".into(),
            content: AnthropicContent::Blocks(vec![ContentBlock::Text { text: "Hi".into() }]),
        };
        let json2 = serde_json::to_string(&msg2).unwrap();
        assert!(json2.contains("\"type\":\"text\""));
    }
}
