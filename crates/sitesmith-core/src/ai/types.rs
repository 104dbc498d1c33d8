//! Messages API wire types
//!
//! These are NOT domain types - they mirror the Anthropic Messages API wire format

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition advertised to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Tool call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Message role in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Content types that can be in a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },

    #[serde(rename = "tool_result")]
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },

    /// Extended thinking content block
    #[serde(rename = "thinking")]
    Thinking {
        thinking: String,
        #[serde(default)]
        signature: String,
    },

    /// Redacted thinking (when thinking contains sensitive content)
    #[serde(rename = "redacted_thinking")]
    RedactedThinking { data: String },

    /// Block types this client does not model. Never sent back.
    #[serde(other)]
    Unknown,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }
}

/// One conversation message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMessage {
    pub role: Role,
    pub content: Vec<Content>,
}

impl ModelMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![Content::text(text)],
        }
    }
}

/// Token usage reported for one model call
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// Request body for a non-streaming messages call
#[derive(Debug, Serialize)]
pub struct MessageRequest<'a> {
    pub model: &'a str,
    pub max_tokens: usize,
    #[serde(skip_serializing_if = "is_blank")]
    pub system: &'a str,
    pub messages: &'a [ModelMessage],
    #[serde(skip_serializing_if = "no_tools")]
    pub tools: &'a [AiTool],
}

fn is_blank(system: &&str) -> bool {
    system.trim().is_empty()
}

fn no_tools(tools: &&[AiTool]) -> bool {
    tools.is_empty()
}

/// Response body of a non-streaming messages call
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub content: Vec<Content>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

impl MessageResponse {
    /// Tool calls requested by the model, in order.
    pub fn tool_calls(&self) -> Vec<AiToolCall> {
        self.content
            .iter()
            .filter_map(|block| match block {
                Content::ToolUse { id, name, input } => Some(AiToolCall {
                    id: id.clone(),
                    name: name.clone(),
                    arguments: input.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_parses_mixed_blocks() {
        let response: MessageResponse = serde_json::from_value(json!({
            "id": "msg_1",
            "content": [
                {"type": "thinking", "thinking": "plan first", "signature": "sig"},
                {"type": "text", "text": "Planning the site."},
                {"type": "tool_use", "id": "toolu_1", "name": "plan_site", "input": {"name": "x"}},
                {"type": "server_tool_use", "id": "srv_1"}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 120, "output_tokens": 45, "cache_read_input_tokens": 0}
        }))
        .unwrap();

        assert_eq!(response.content.len(), 4);
        assert_eq!(response.content[3], Content::Unknown);
        assert_eq!(
            response.usage,
            Usage {
                input_tokens: 120,
                output_tokens: 45
            }
        );
        let calls = response.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "plan_site");
        assert_eq!(calls[0].arguments, json!({"name": "x"}));
    }

    #[test]
    fn test_tool_result_wire_shape() {
        let block = Content::ToolResult {
            tool_use_id: "toolu_1".into(),
            content: "Saved".into(),
            is_error: None,
        };
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"type": "tool_result", "tool_use_id": "toolu_1", "content": "Saved"})
        );
    }

    #[test]
    fn test_request_omits_empty_system_and_tools() {
        let messages = vec![ModelMessage::user_text("hi")];
        let request = MessageRequest {
            model: "m",
            max_tokens: 10,
            system: "",
            messages: &messages,
            tools: &[],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("system").is_none());
        assert!(value.get("tools").is_none());
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"][0]["type"], "text");
    }
}
