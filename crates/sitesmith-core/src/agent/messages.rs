//! Model-backed agent runtime
//!
//! Drives an Anthropic-compatible Messages endpoint through a plain tool-use
//! loop: call the model, run every requested tool in order, feed the results
//! back, repeat until the model stops asking for tools.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::events::AgentEvent;
use super::runtime::{
    AgentFactory, AgentListener, AgentRuntime, AgentSetup, ListenerSet, Subscription,
};
use crate::ai::types::{AiTool, Content, ModelMessage, Role};
use crate::ai::{AiClient, AiClientConfig};
use crate::tools::{truncate_chars, SiteToolbox};

/// Tool result text sent back to the model is cut at this many bytes.
pub const MAX_TOOL_RESULT_CHARS: usize = 30_000;

pub struct MessagesAgent {
    client: AiClient,
    toolbox: SiteToolbox,
    tools: Vec<AiTool>,
    system_prompt: String,
    max_turns: usize,
    listeners: ListenerSet,
    conversation: tokio::sync::Mutex<Vec<ModelMessage>>,
}

impl MessagesAgent {
    pub fn new(client: AiClient, setup: AgentSetup) -> Self {
        Self {
            client,
            tools: setup.toolbox.definitions(),
            toolbox: setup.toolbox,
            system_prompt: setup.system_prompt,
            max_turns: setup.config.max_turns.max(1),
            listeners: ListenerSet::new(),
            conversation: tokio::sync::Mutex::new(Vec::new()),
        }
    }

    /// Factory building a fresh client and agent per session.
    pub fn factory() -> AgentFactory {
        Arc::new(|setup: AgentSetup| -> anyhow::Result<Arc<dyn AgentRuntime>> {
            let client = AiClient::new(AiClientConfig::from(&setup.config))
                .context("failed to create model client")?;
            Ok(Arc::new(MessagesAgent::new(client, setup)))
        })
    }

    fn emit(&self, event: AgentEvent) {
        self.listeners.emit(&event);
    }

    /// Execute each call in order, returning the tool_result blocks.
    fn run_tools(&self, blocks: &[Content]) -> Vec<Content> {
        let mut results = Vec::new();
        for block in blocks {
            let Content::ToolUse { id, name, input } = block else {
                continue;
            };
            self.emit(AgentEvent::ToolExecutionStart {
                tool_call_id: id.clone(),
                tool_name: name.clone(),
                args: input.clone(),
            });

            let outcome = self.toolbox.invoke(name, input.clone());
            let content = truncate_chars(&outcome.text, MAX_TOOL_RESULT_CHARS);
            let is_error = outcome.is_error.then_some(true);

            self.emit(AgentEvent::ToolExecutionEnd {
                tool_call_id: id.clone(),
                tool_name: name.clone(),
                outcome,
            });
            results.push(Content::ToolResult {
                tool_use_id: id.clone(),
                content,
                is_error,
            });
        }
        results
    }
}

#[async_trait]
impl AgentRuntime for MessagesAgent {
    fn subscribe(&self, listener: AgentListener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    async fn prompt(&self, text: &str) -> anyhow::Result<()> {
        let mut conversation = self.conversation.lock().await;
        conversation.push(ModelMessage::user_text(text));
        self.emit(AgentEvent::AgentStart);

        for turn_index in 0..self.max_turns {
            self.emit(AgentEvent::TurnStart { turn_index });

            let response = self
                .client
                .create_message(&self.system_prompt, &conversation, &self.tools)
                .await
                .with_context(|| format!("model call failed on turn {}", turn_index + 1))?;

            if response.stop_reason.as_deref() == Some("max_tokens") {
                warn!(turn = turn_index, "Model response hit max_tokens");
            }

            for block in &response.content {
                match block {
                    Content::Thinking { thinking, .. } if !thinking.is_empty() => {
                        self.emit(AgentEvent::ThinkingDelta {
                            thinking: thinking.clone(),
                        })
                    }
                    Content::Text { text } if !text.is_empty() => self.emit(AgentEvent::TextDelta {
                        text: text.clone(),
                    }),
                    _ => {}
                }
            }

            let assistant: Vec<Content> = response
                .content
                .into_iter()
                .filter(|block| match block {
                    Content::Unknown => false,
                    Content::Text { text } => !text.is_empty(),
                    _ => true,
                })
                .collect();
            let has_tool_calls = assistant
                .iter()
                .any(|block| matches!(block, Content::ToolUse { .. }));

            let results = if has_tool_calls {
                self.run_tools(&assistant)
            } else {
                Vec::new()
            };

            if !assistant.is_empty() {
                conversation.push(ModelMessage {
                    role: Role::Assistant,
                    content: assistant,
                });
            }

            self.emit(AgentEvent::TurnEnd {
                turn_index,
                usage: Some(response.usage),
            });

            if !has_tool_calls {
                debug!(turns = turn_index + 1, "Model finished without further tool calls");
                self.emit(AgentEvent::AgentEnd);
                return Ok(());
            }

            conversation.push(ModelMessage {
                role: Role::User,
                content: results,
            });
        }

        warn!(max_turns = self.max_turns, "Turn limit reached, ending run");
        self.emit(AgentEvent::AgentEnd);
        Ok(())
    }
}
