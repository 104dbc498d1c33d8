//! Raw events emitted by an agent runtime while it runs.
//!
//! These are runtime-level facts (turns, deltas, tool executions). The
//! generation bridge translates them into the domain `GenerationEvent`s that
//! callers see.

use serde_json::Value;

use crate::ai::types::Usage;
use crate::tools::ToolOutcome;

#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Run accepted the prompt.
    AgentStart,

    /// A model round-trip begins.
    TurnStart { turn_index: usize },

    TextDelta { text: String },

    ThinkingDelta { thinking: String },

    /// A tool call is about to run.
    ToolExecutionStart {
        tool_call_id: String,
        tool_name: String,
        args: Value,
    },

    /// A tool call finished. `outcome` is exactly what the toolbox returned.
    ToolExecutionEnd {
        tool_call_id: String,
        tool_name: String,
        outcome: ToolOutcome,
    },

    /// A model round-trip and its tool calls are done.
    TurnEnd {
        turn_index: usize,
        usage: Option<Usage>,
    },

    /// Run finished without error.
    AgentEnd,
}
