//! Domain events produced by a generation session.
//!
//! `GenerationEvent` is what callers (server, CLI) consume. Each session
//! yields them in emission order and ends with exactly one terminal event,
//! `complete` or `error`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ai::types::Usage;
use crate::site::SiteSpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationEvent {
    /// Human-readable progress line.
    Status { message: String },

    /// The site plan was committed.
    Spec { spec: SiteSpec },

    /// A page was committed.
    Page { filename: String, html: String },

    Thinking { text: String },

    #[serde(rename_all = "camelCase")]
    ToolActivity {
        tool_call_id: String,
        tool_name: String,
        phase: ToolPhase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        args: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },

    /// Cumulative token usage so far.
    Usage(TokenUsage),

    #[serde(rename_all = "camelCase")]
    Complete {
        pages: BTreeMap<String, String>,
        spec: SiteSpec,
        usage: TokenUsage,
        tool_metrics: ToolMetrics,
        validation_passed: bool,
    },

    #[serde(rename_all = "camelCase")]
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<TokenUsage>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_metrics: Option<ToolMetrics>,
    },
}

impl GenerationEvent {
    pub fn status(message: impl Into<String>) -> Self {
        GenerationEvent::Status {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>, usage: TokenUsage, tool_metrics: ToolMetrics) -> Self {
        GenerationEvent::Error {
            message: message.into(),
            usage: Some(usage),
            tool_metrics: Some(tool_metrics),
        }
    }

    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GenerationEvent::Complete { .. } | GenerationEvent::Error { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolPhase {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn add(&mut self, usage: &Usage) {
        self.input_tokens += usage.input_tokens;
        self.output_tokens += usage.output_tokens;
    }

    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolStats {
    pub calls: u64,
    pub failures: u64,
    pub total_duration_ms: u64,
}

/// Per-tool call statistics for one session, keyed by wire name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolMetrics(BTreeMap<String, ToolStats>);

impl ToolMetrics {
    pub fn record(&mut self, tool: &str, is_error: bool, duration_ms: u64) {
        let stats = self.0.entry(tool.to_string()).or_default();
        stats.calls += 1;
        if is_error {
            stats.failures += 1;
        }
        stats.total_duration_ms += duration_ms;
    }

    pub fn get(&self, tool: &str) -> Option<&ToolStats> {
        self.0.get(tool)
    }

    pub fn total_calls(&self) -> u64 {
        self.0.values().map(|s| s.calls).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let event = GenerationEvent::ToolActivity {
            tool_call_id: "call_1".into(),
            tool_name: "write_page".into(),
            phase: ToolPhase::End,
            args: None,
            result: Some("Saved".into()),
            is_error: Some(false),
            duration_ms: Some(3),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "tool_activity",
                "toolCallId": "call_1",
                "toolName": "write_page",
                "phase": "end",
                "result": "Saved",
                "isError": false,
                "durationMs": 3
            })
        );

        let usage = GenerationEvent::Usage(TokenUsage {
            input_tokens: 5,
            output_tokens: 7,
        });
        assert_eq!(
            serde_json::to_value(&usage).unwrap(),
            json!({"type": "usage", "inputTokens": 5, "outputTokens": 7})
        );
    }

    #[test]
    fn test_error_event_omits_absent_fields() {
        let event = GenerationEvent::Error {
            message: "boom".into(),
            usage: None,
            tool_metrics: None,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "error", "message": "boom"})
        );
        assert!(event.is_terminal());
        assert!(!GenerationEvent::status("x").is_terminal());
    }

    #[test]
    fn test_metrics_accumulate() {
        let mut metrics = ToolMetrics::default();
        metrics.record("write_page", false, 4);
        metrics.record("write_page", true, 6);
        metrics.record("plan_site", false, 1);

        let write = metrics.get("write_page").unwrap();
        assert_eq!(write.calls, 2);
        assert_eq!(write.failures, 1);
        assert_eq!(write.total_duration_ms, 10);
        assert_eq!(metrics.total_calls(), 3);
        assert_eq!(
            serde_json::to_value(&metrics).unwrap()["plan_site"],
            json!({"calls": 1, "failures": 0, "totalDurationMs": 1})
        );
    }

    #[test]
    fn test_usage_is_additive() {
        let mut total = TokenUsage::default();
        total.add(&Usage {
            input_tokens: 100,
            output_tokens: 20,
        });
        total.add(&Usage {
            input_tokens: 50,
            output_tokens: 5,
        });
        assert_eq!(total.input_tokens, 150);
        assert_eq!(total.output_tokens, 25);
        assert_eq!(total.total(), 175);
    }
}
