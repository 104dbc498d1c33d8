//! Terminal event for a run that finished without failing

use super::events::{GenerationEvent, TokenUsage, ToolMetrics};
use crate::site::{GenerationState, SiteSpec};

pub const NO_PAGES_MESSAGE: &str = "No pages were generated";

/// Decide the terminal event from the final state.
///
/// Pages without a plan still complete, with a fallback spec, so any produced
/// output is renderable. No pages at all is an error even if the run itself
/// succeeded.
pub fn resolve_completion(
    state: &GenerationState,
    usage: TokenUsage,
    tool_metrics: ToolMetrics,
) -> GenerationEvent {
    if state.pages.is_empty() {
        return GenerationEvent::error(NO_PAGES_MESSAGE, usage, tool_metrics);
    }

    let spec = match &state.spec {
        Some(spec) => spec.clone(),
        None => {
            tracing::info!("No site plan recorded, completing with fallback spec");
            SiteSpec::fallback()
        }
    };

    GenerationEvent::Complete {
        pages: state.pages.clone(),
        spec,
        usage,
        tool_metrics,
        validation_passed: state.validation_passed,
    }
}
