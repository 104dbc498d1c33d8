//! Generation orchestration
//!
//! ```text
//!  generate() ─► GenerationSession ─► EventBridge ─► agent run (spawned)
//!                      │                   ▲              │
//!                      │                   └── listener ◄─┘
//!                      └─► resolve_completion (terminal event)
//! ```

pub mod bridge;
pub mod events;
pub mod prompt;
pub mod resolver;
pub mod session;

pub use bridge::{EventBridge, EventTranslator, WAKE_TIMEOUT};
pub use events::{GenerationEvent, TokenUsage, ToolMetrics, ToolPhase, ToolStats};
pub use prompt::{build_user_prompt, DEFAULT_SYSTEM_PROMPT};
pub use resolver::resolve_completion;
pub use session::{generate, GenerationDeps, GenerationRequest, GenerationSession};
