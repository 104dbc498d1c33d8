//! SiteSmith core
//!
//! Drives a tool-using agent through plan, write, validate and revise to turn
//! one natural-language request into a set of validated HTML pages, exposing
//! progress as an ordered pull-based event stream.

pub mod agent;
pub mod ai;
pub mod config;
pub mod constants;
pub mod generation;
pub mod paths;
pub mod site;
pub mod tools;
pub mod validation;

pub use config::{ConfigError, GeneratorConfig};
pub use generation::{
    generate, GenerationDeps, GenerationEvent, GenerationRequest, GenerationSession, TokenUsage,
    ToolMetrics,
};
pub use site::{GenerationState, SiteSpec};
