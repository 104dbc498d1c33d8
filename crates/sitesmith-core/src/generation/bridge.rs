//! Callback-to-pull bridge between an agent runtime and a generation session
//!
//! The agent pushes raw events through a listener on its own schedule. The
//! listener translates them and enqueues the results on an unbounded channel;
//! the session pulls from the other end. The run task appends a `Finished`
//! marker once `prompt` returns, so "run done and queue drained" is exactly
//! "marker dequeued".
//!
//! ```text
//!  agent run task ──listener──► translate ──► queue ──► next_event()
//!                 └── error / Finished ─────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{warn, Instrument, Span};

use super::events::{GenerationEvent, TokenUsage, ToolMetrics, ToolPhase};
use crate::agent::{AgentEvent, AgentRuntime, Subscription};
use crate::tools::{truncate_chars, ToolDetails, ToolKind, ToolOutcome};

/// Upper bound on a single wait for the next queued event.
pub const WAKE_TIMEOUT: Duration = Duration::from_millis(100);

/// Strings in tool_activity payloads are cut to this many bytes.
pub const MAX_ACTIVITY_CHARS: usize = 2_000;

pub(crate) const PANIC_MESSAGE: &str = "Generation task panicked";

/// Stateful translation of raw agent events into domain events.
///
/// Also accumulates the session's token usage and tool metrics.
#[derive(Debug, Default)]
pub struct EventTranslator {
    in_flight: HashMap<String, Instant>,
    usage: TokenUsage,
    metrics: ToolMetrics,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn usage(&self) -> TokenUsage {
        self.usage
    }

    pub fn metrics(&self) -> &ToolMetrics {
        &self.metrics
    }

    /// Domain events for one raw event, in the order they must be yielded.
    pub fn translate(&mut self, event: &AgentEvent) -> Vec<GenerationEvent> {
        match event {
            AgentEvent::AgentStart => vec![GenerationEvent::status("Reading your request")],
            AgentEvent::TurnStart { .. } | AgentEvent::TextDelta { .. } | AgentEvent::AgentEnd => {
                Vec::new()
            }
            AgentEvent::ThinkingDelta { thinking } => vec![GenerationEvent::Thinking {
                text: thinking.clone(),
            }],
            AgentEvent::ToolExecutionStart {
                tool_call_id,
                tool_name,
                args,
            } => {
                self.in_flight.insert(tool_call_id.clone(), Instant::now());
                vec![
                    GenerationEvent::status(start_message(tool_name, args)),
                    GenerationEvent::ToolActivity {
                        tool_call_id: tool_call_id.clone(),
                        tool_name: tool_name.clone(),
                        phase: ToolPhase::Start,
                        args: Some(truncate_value(args)),
                        result: None,
                        is_error: None,
                        duration_ms: None,
                    },
                ]
            }
            AgentEvent::ToolExecutionEnd {
                tool_call_id,
                tool_name,
                outcome,
            } => {
                let duration_ms = self
                    .in_flight
                    .remove(tool_call_id)
                    .map(|started| started.elapsed().as_millis() as u64)
                    .unwrap_or(0);
                self.metrics.record(tool_name, outcome.is_error, duration_ms);

                let mut events = vec![GenerationEvent::ToolActivity {
                    tool_call_id: tool_call_id.clone(),
                    tool_name: tool_name.clone(),
                    phase: ToolPhase::End,
                    args: None,
                    result: Some(truncate_chars(&outcome.text, MAX_ACTIVITY_CHARS)),
                    is_error: Some(outcome.is_error),
                    duration_ms: Some(duration_ms),
                }];
                events.extend(follow_up(outcome));
                events
            }
            AgentEvent::TurnEnd { usage, .. } => match usage {
                Some(usage) => {
                    self.usage.add(usage);
                    vec![GenerationEvent::Usage(self.usage)]
                }
                None => Vec::new(),
            },
        }
    }
}

fn start_message(tool_name: &str, args: &Value) -> String {
    let filename = args
        .get("filename")
        .and_then(Value::as_str)
        .unwrap_or("page");
    match ToolKind::from_name(tool_name) {
        Some(ToolKind::PlanSite) => "Planning site structure".to_string(),
        Some(ToolKind::WritePage) => format!("Writing {}", filename),
        Some(ToolKind::EditPage) => format!("Editing {}", filename),
        Some(ToolKind::ReadPage) => format!("Reviewing {}", filename),
        Some(ToolKind::ValidateSite) => "Validating site".to_string(),
        None => format!("Running {}", tool_name),
    }
}

/// Domain events implied by a finished tool call.
fn follow_up(outcome: &ToolOutcome) -> Option<GenerationEvent> {
    if outcome.is_error {
        return None;
    }
    match &outcome.details {
        ToolDetails::Plan { spec } => Some(GenerationEvent::Spec { spec: spec.clone() }),
        ToolDetails::Page(page) => Some(GenerationEvent::Page {
            filename: page.filename.clone(),
            html: page.html.clone(),
        }),
        ToolDetails::Validation {
            passed: true,
            ..
        } => Some(GenerationEvent::status("Validation passed")),
        ToolDetails::Validation {
            passed: false,
            issue_count: 0,
        } => Some(GenerationEvent::status("Validation needs improvement")),
        ToolDetails::Validation {
            passed: false,
            issue_count,
        } => Some(GenerationEvent::status(format!(
            "Validation found {} issue(s)",
            issue_count
        ))),
        ToolDetails::None => None,
    }
}

/// Copy of `value` with every long string truncated.
fn truncate_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(truncate_chars(s, MAX_ACTIVITY_CHARS)),
        Value::Array(items) => Value::Array(items.iter().map(truncate_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), truncate_value(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

enum BridgeMessage {
    Event(GenerationEvent),
    Finished,
}

/// Pull side of a running agent.
pub struct EventBridge {
    rx: mpsc::UnboundedReceiver<BridgeMessage>,
    handle: Option<JoinHandle<()>>,
    subscription: Option<Subscription>,
    translator: Arc<Mutex<EventTranslator>>,
    failed: bool,
    done: bool,
}

impl EventBridge {
    /// Subscribe to `agent` and spawn its run on `prompt`.
    ///
    /// The run task is instrumented with `span`.
    pub fn start(
        agent: Arc<dyn AgentRuntime>,
        prompt: String,
        translator: Arc<Mutex<EventTranslator>>,
        span: Span,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let listener_tx = tx.clone();
        let listener_translator = Arc::clone(&translator);
        let subscription = agent.subscribe(Arc::new(move |event: &AgentEvent| {
            let events = listener_translator.lock().translate(event);
            for event in events {
                // receiver gone means the session was dropped
                let _ = listener_tx.send(BridgeMessage::Event(event));
            }
        }));

        let run_translator = Arc::clone(&translator);
        let handle = tokio::spawn(
            async move {
                if let Err(err) = agent.prompt(&prompt).await {
                    let message = format!("{:#}", err);
                    warn!(error = %message, "Generation run failed");
                    let event = {
                        let t = run_translator.lock();
                        GenerationEvent::error(message, t.usage(), t.metrics().clone())
                    };
                    let _ = tx.send(BridgeMessage::Event(event));
                }
                let _ = tx.send(BridgeMessage::Finished);
            }
            .instrument(span),
        );

        Self {
            rx,
            handle: Some(handle),
            subscription: Some(subscription),
            translator,
            failed: false,
            done: false,
        }
    }

    /// Whether the run ended in a failure. An error event has then already
    /// been yielded.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Next translated event, or `None` once the run has finished and every
    /// queued event was yielded.
    pub async fn next_event(&mut self) -> Option<GenerationEvent> {
        if self.done {
            return None;
        }
        loop {
            match tokio::time::timeout(WAKE_TIMEOUT, self.rx.recv()).await {
                Ok(Some(BridgeMessage::Event(event))) => return Some(self.observe(event)),
                Ok(Some(BridgeMessage::Finished)) => {
                    self.close().await;
                    return None;
                }
                // every sender dropped without the marker
                Ok(None) => return self.close_without_marker().await,
                Err(_) => {
                    let ended = self.handle.as_ref().map_or(true, |h| h.is_finished());
                    if !ended {
                        continue;
                    }
                    match self.rx.try_recv() {
                        Ok(BridgeMessage::Event(event)) => return Some(self.observe(event)),
                        Ok(BridgeMessage::Finished) => {
                            self.close().await;
                            return None;
                        }
                        Err(_) => return self.close_without_marker().await,
                    }
                }
            }
        }
    }

    fn observe(&mut self, event: GenerationEvent) -> GenerationEvent {
        if matches!(event, GenerationEvent::Error { .. }) {
            self.failed = true;
        }
        event
    }

    /// Join the run task and release the subscription.
    async fn close(&mut self) -> Option<tokio::task::JoinError> {
        self.done = true;
        self.subscription.take();
        match self.handle.take() {
            Some(handle) => handle.await.err(),
            None => None,
        }
    }

    async fn close_without_marker(&mut self) -> Option<GenerationEvent> {
        let join_error = self.close().await;
        if self.failed {
            return None;
        }
        let message = match join_error {
            Some(err) if err.is_panic() => PANIC_MESSAGE.to_string(),
            Some(err) => format!("Generation task ended unexpectedly: {}", err),
            None => "Generation task ended unexpectedly".to_string(),
        };
        warn!(error = %message, "Generation run ended without completion");
        self.failed = true;
        let t = self.translator.lock();
        Some(GenerationEvent::error(message, t.usage(), t.metrics().clone()))
    }
}
