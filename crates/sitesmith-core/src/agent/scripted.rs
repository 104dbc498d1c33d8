//! Deterministic agent runtime that replays a fixed script
//!
//! Runs real tool calls against the session toolbox and emits the same raw
//! events as the model-backed runtime, without any network access.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::events::AgentEvent;
use super::runtime::{
    AgentFactory, AgentListener, AgentRuntime, AgentSetup, ListenerSet, Subscription,
};
use crate::ai::types::Usage;
use crate::tools::SiteToolbox;

#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Invoke a tool by wire name.
    CallTool { name: String, args: Value },
    Think(String),
    Say(String),
    /// End the current turn reporting this usage.
    Usage { input: u64, output: u64 },
    /// Sleep, simulating model latency.
    Wait(Duration),
    /// Abort the run with this error message.
    Fail(String),
}

impl ScriptStep {
    pub fn call(name: &str, args: Value) -> Self {
        ScriptStep::CallTool {
            name: name.to_string(),
            args,
        }
    }
}

pub struct ScriptedAgent {
    steps: Vec<ScriptStep>,
    toolbox: SiteToolbox,
    listeners: ListenerSet,
}

impl ScriptedAgent {
    pub fn new(steps: Vec<ScriptStep>, toolbox: SiteToolbox) -> Self {
        Self {
            steps,
            toolbox,
            listeners: ListenerSet::new(),
        }
    }

    /// Factory replaying `steps` in every session it builds.
    pub fn factory(steps: Vec<ScriptStep>) -> AgentFactory {
        Arc::new(move |setup: AgentSetup| -> anyhow::Result<Arc<dyn AgentRuntime>> {
            Ok(Arc::new(ScriptedAgent::new(steps.clone(), setup.toolbox)))
        })
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn emit(&self, event: AgentEvent) {
        self.listeners.emit(&event);
    }
}

#[async_trait]
impl AgentRuntime for ScriptedAgent {
    fn subscribe(&self, listener: AgentListener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    async fn prompt(&self, _text: &str) -> anyhow::Result<()> {
        self.emit(AgentEvent::AgentStart);
        let mut turn_index = 0;
        self.emit(AgentEvent::TurnStart { turn_index });

        for (i, step) in self.steps.iter().enumerate() {
            match step {
                ScriptStep::CallTool { name, args } => {
                    let tool_call_id = format!("call_{}", i);
                    self.emit(AgentEvent::ToolExecutionStart {
                        tool_call_id: tool_call_id.clone(),
                        tool_name: name.clone(),
                        args: args.clone(),
                    });
                    let outcome = self.toolbox.invoke(name, args.clone());
                    self.emit(AgentEvent::ToolExecutionEnd {
                        tool_call_id,
                        tool_name: name.clone(),
                        outcome,
                    });
                }
                ScriptStep::Think(thinking) => self.emit(AgentEvent::ThinkingDelta {
                    thinking: thinking.clone(),
                }),
                ScriptStep::Say(text) => self.emit(AgentEvent::TextDelta { text: text.clone() }),
                ScriptStep::Usage { input, output } => {
                    self.emit(AgentEvent::TurnEnd {
                        turn_index,
                        usage: Some(Usage {
                            input_tokens: *input,
                            output_tokens: *output,
                        }),
                    });
                    turn_index += 1;
                    self.emit(AgentEvent::TurnStart { turn_index });
                }
                ScriptStep::Wait(duration) => tokio::time::sleep(*duration).await,
                ScriptStep::Fail(message) => anyhow::bail!("{}", message),
            }
            tokio::task::yield_now().await;
        }

        self.emit(AgentEvent::TurnEnd {
            turn_index,
            usage: None,
        });
        self.emit(AgentEvent::AgentEnd);
        Ok(())
    }
}
