//! Site tools
//!
//! The agent builds a site exclusively through these tools. Each one reads or
//! mutates the session's `GenerationState` under the content validator's gate.

pub mod implementations;
pub mod registry;
pub mod truncation;

pub use registry::{
    execute, parse_params, tool_definitions, PageDetails, SiteToolCall, SiteToolbox, ToolDetails,
    ToolKind, ToolOutcome,
};
pub use truncation::truncate_chars;
