//! The agent runtime seam
//!
//! A runtime is anything that can take a prompt, drive the site tools to a
//! finished run and report what it does through subscribed listeners. The
//! generation session only ever talks to `dyn AgentRuntime`, so a scripted
//! runtime can stand in for the model-backed one.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::events::AgentEvent;
use crate::config::GeneratorConfig;
use crate::tools::SiteToolbox;

/// Callback invoked synchronously for every raw event, in emission order.
pub type AgentListener = Arc<dyn Fn(&AgentEvent) + Send + Sync>;

#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Register a listener. It stays registered until the returned
    /// subscription is dropped.
    fn subscribe(&self, listener: AgentListener) -> Subscription;

    /// Run the prompt to completion. Tool calls happen inside this future.
    async fn prompt(&self, text: &str) -> anyhow::Result<()>;
}

/// Everything a runtime needs for one generation session.
#[derive(Clone)]
pub struct AgentSetup {
    pub system_prompt: String,
    pub toolbox: SiteToolbox,
    pub config: GeneratorConfig,
}

/// Builds the runtime for a session. Swapped out in tests.
pub type AgentFactory =
    Arc<dyn Fn(AgentSetup) -> anyhow::Result<Arc<dyn AgentRuntime>> + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, AgentListener)>,
}

/// Listener bookkeeping shared by runtime implementations.
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Arc<Mutex<Listeners>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: AgentListener) -> Subscription {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, listener));
        Subscription {
            id,
            set: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every current listener.
    ///
    /// Listeners are snapshotted first so a listener may subscribe or
    /// unsubscribe without deadlocking.
    pub fn emit(&self, event: &AgentEvent) {
        let listeners: Vec<AgentListener> = self
            .inner
            .lock()
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for a registered listener. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    set: Weak<Mutex<Listeners>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(set) = self.set.upgrade() {
            set.lock().entries.retain(|(id, _)| *id != self.id);
        }
    }
}
