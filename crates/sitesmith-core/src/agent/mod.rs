//! Agent runtimes
//!
//! - `runtime`: the trait every runtime implements, plus listener plumbing
//! - `messages`: model-backed runtime over the Messages API
//! - `scripted`: replays a fixed list of steps, no network

pub mod events;
pub mod messages;
pub mod runtime;
pub mod scripted;

pub use events::AgentEvent;
pub use messages::MessagesAgent;
pub use runtime::{
    AgentFactory, AgentListener, AgentRuntime, AgentSetup, ListenerSet, Subscription,
};
pub use scripted::{ScriptStep, ScriptedAgent};
