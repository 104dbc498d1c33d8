//! Generation session: the orchestrator entry point
//!
//! `generate` wires a fresh state, toolbox and agent together for one request
//! and hands back a pull-based session. Nothing runs until the first
//! `next_event` call. Dropping the session early does not stop the run; it
//! finishes in the background and its events are discarded.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::Stream;
use parking_lot::Mutex;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use super::bridge::{EventBridge, EventTranslator};
use super::events::{GenerationEvent, TokenUsage, ToolMetrics};
use super::prompt::{build_user_prompt, DEFAULT_SYSTEM_PROMPT};
use super::resolver::resolve_completion;
use crate::agent::{AgentFactory, AgentSetup, MessagesAgent};
use crate::config::GeneratorConfig;
use crate::site::{GenerationState, SiteSpec};
use crate::tools::SiteToolbox;

/// What to build, optionally as a revision of an existing site.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub user_request: String,
    pub existing_spec: Option<SiteSpec>,
    pub existing_pages: Option<BTreeMap<String, String>>,
}

impl GenerationRequest {
    pub fn new(user_request: impl Into<String>) -> Self {
        Self {
            user_request: user_request.into(),
            ..Default::default()
        }
    }
}

/// Collaborators for a session. The agent factory is the override seam.
#[derive(Clone)]
pub struct GenerationDeps {
    pub config: GeneratorConfig,
    pub agent_factory: AgentFactory,
    /// Replaces the configured or built-in system prompt
    pub system_prompt: Option<String>,
}

impl GenerationDeps {
    /// Model-backed agent configured from `config`.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            agent_factory: MessagesAgent::factory(),
            system_prompt: None,
        }
    }

    pub fn with_agent_factory(mut self, factory: AgentFactory) -> Self {
        self.agent_factory = factory;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Start a generation. The returned session is lazy and finite.
pub fn generate(request: GenerationRequest, deps: GenerationDeps) -> GenerationSession {
    GenerationSession {
        id: Uuid::new_v4(),
        phase: Phase::Pending(Box::new(Pending { request, deps })),
    }
}

struct Pending {
    request: GenerationRequest,
    deps: GenerationDeps,
}

struct Running {
    bridge: EventBridge,
    state: Arc<Mutex<GenerationState>>,
    translator: Arc<Mutex<EventTranslator>>,
}

enum Phase {
    Pending(Box<Pending>),
    Running(Box<Running>),
    Done,
}

/// One in-progress generation, consumed by pulling events.
pub struct GenerationSession {
    id: Uuid,
    phase: Phase,
}

impl GenerationSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next event, or `None` after the terminal event was yielded.
    pub async fn next_event(&mut self) -> Option<GenerationEvent> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Pending(pending) => match self.start(*pending) {
                    Ok(running) => self.phase = Phase::Running(Box::new(running)),
                    Err(event) => return Some(event),
                },
                Phase::Running(mut running) => {
                    if let Some(event) = running.bridge.next_event().await {
                        self.phase = Phase::Running(running);
                        return Some(event);
                    }
                    return self.finish(*running);
                }
                Phase::Done => return None,
            }
        }
    }

    /// Adapt the session into a `Stream` of events.
    pub fn into_stream(self) -> impl Stream<Item = GenerationEvent> + Send + 'static {
        futures::stream::unfold(self, |mut session| async move {
            session.next_event().await.map(|event| (event, session))
        })
    }

    fn start(&self, pending: Pending) -> Result<Running, GenerationEvent> {
        let Pending { request, deps } = pending;
        let span = info_span!("generation", session_id = %self.id);
        let _enter = span.enter();

        let system_prompt = match deps.system_prompt {
            Some(prompt) => prompt,
            None => match deps.config.resolve_system_prompt() {
                Ok(Some(prompt)) => prompt,
                Ok(None) => DEFAULT_SYSTEM_PROMPT.to_string(),
                Err(err) => return Err(startup_failure(err.into())),
            },
        };

        let user_prompt = build_user_prompt(
            &request.user_request,
            request.existing_spec.as_ref(),
            request.existing_pages.as_ref(),
        );
        let state = GenerationState::seeded(
            request.existing_spec,
            request.existing_pages.unwrap_or_default(),
        );
        let toolbox = SiteToolbox::new(state);

        let agent = (deps.agent_factory)(AgentSetup {
            system_prompt,
            toolbox: toolbox.clone(),
            config: deps.config,
        })
        .map_err(startup_failure)?;

        info!(
            seeded_pages = toolbox.state().lock().pages.len(),
            "Generation started"
        );

        let translator = Arc::new(Mutex::new(EventTranslator::new()));
        let bridge = EventBridge::start(agent, user_prompt, Arc::clone(&translator), span.clone());

        Ok(Running {
            bridge,
            state: toolbox.state(),
            translator,
        })
    }

    fn finish(&self, running: Running) -> Option<GenerationEvent> {
        let _enter = info_span!("generation", session_id = %self.id).entered();
        if running.bridge.failed() {
            return None;
        }

        let state = running.state.lock();
        let (usage, metrics) = {
            let t = running.translator.lock();
            (t.usage(), t.metrics().clone())
        };
        let event = resolve_completion(&state, usage, metrics);
        match &event {
            GenerationEvent::Complete { pages, .. } => info!(
                pages = pages.len(),
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Generation complete"
            ),
            _ => warn!("Generation finished without pages"),
        }
        Some(event)
    }
}

fn startup_failure(err: anyhow::Error) -> GenerationEvent {
    let message = format!("{:#}", err);
    warn!(error = %message, "Generation could not start");
    GenerationEvent::error(message, TokenUsage::default(), ToolMetrics::default())
}
