//! Tool registry for the five site tools
//!
//! Dispatch is a closed enum: arguments are parsed once into a `SiteToolCall`
//! and every state mutation goes through the single `execute` match.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ai::types::AiTool;
use crate::site::{GenerationState, SiteSpec};
use crate::tools::implementations::{edit_page, plan, read_page, validate_site, write_page};

/// The tools exposed to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    PlanSite,
    WritePage,
    EditPage,
    ReadPage,
    ValidateSite,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::PlanSite,
        ToolKind::WritePage,
        ToolKind::EditPage,
        ToolKind::ReadPage,
        ToolKind::ValidateSite,
    ];

    /// Wire name sent to the model.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::PlanSite => "plan_site",
            ToolKind::WritePage => "write_page",
            ToolKind::EditPage => "edit_page",
            ToolKind::ReadPage => "read_page",
            ToolKind::ValidateSite => "validate_site",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::PlanSite => plan::DESCRIPTION,
            ToolKind::WritePage => write_page::DESCRIPTION,
            ToolKind::EditPage => edit_page::DESCRIPTION,
            ToolKind::ReadPage => read_page::DESCRIPTION,
            ToolKind::ValidateSite => validate_site::DESCRIPTION,
        }
    }

    pub fn parameters_schema(self) -> Value {
        match self {
            ToolKind::PlanSite => plan::parameters_schema(),
            ToolKind::WritePage => write_page::parameters_schema(),
            ToolKind::EditPage => edit_page::parameters_schema(),
            ToolKind::ReadPage => read_page::parameters_schema(),
            ToolKind::ValidateSite => validate_site::parameters_schema(),
        }
    }
}

/// Structured payload attached to a tool outcome, consumed by the event bridge.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolDetails {
    #[default]
    None,
    Plan {
        spec: SiteSpec,
    },
    Page(PageDetails),
    Validation {
        passed: bool,
        issue_count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetails {
    pub filename: String,
    pub html: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

/// Tool execution result
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    /// Explanation fed back to the agent
    pub text: String,
    pub details: ToolDetails,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self::success_with(text, ToolDetails::None)
    }

    pub fn success_with(text: impl Into<String>, details: ToolDetails) -> Self {
        Self {
            text: text.into(),
            details,
            is_error: false,
        }
    }

    pub fn error(msg: impl std::fmt::Display) -> Self {
        Self::error_with(msg, ToolDetails::None)
    }

    pub fn error_with(msg: impl std::fmt::Display, details: ToolDetails) -> Self {
        Self {
            text: msg.to_string(),
            details,
            is_error: true,
        }
    }

    pub fn invalid_parameters(msg: impl std::fmt::Display) -> Self {
        Self::error(format!("Invalid parameters: {}", msg))
    }

    pub fn unknown_tool(name: &str) -> Self {
        let known: Vec<&str> = ToolKind::ALL.iter().map(|k| k.name()).collect();
        Self::error(format!(
            "Unknown tool: {}. Available tools: {}",
            name,
            known.join(", ")
        ))
    }
}

/// Parse tool parameters, returning a ToolOutcome error on failure
pub fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ToolOutcome> {
    serde_json::from_value(params).map_err(ToolOutcome::invalid_parameters)
}

/// A fully parsed tool invocation.
#[derive(Debug, Clone)]
pub enum SiteToolCall {
    PlanSite(Box<SiteSpec>),
    WritePage(write_page::Params),
    EditPage(edit_page::Params),
    ReadPage(read_page::Params),
    ValidateSite(validate_site::Params),
}

impl SiteToolCall {
    pub fn parse(name: &str, args: Value) -> Result<Self, ToolOutcome> {
        let kind = ToolKind::from_name(name).ok_or_else(|| ToolOutcome::unknown_tool(name))?;
        Ok(match kind {
            ToolKind::PlanSite => SiteToolCall::PlanSite(Box::new(parse_params(args)?)),
            ToolKind::WritePage => SiteToolCall::WritePage(parse_params(args)?),
            ToolKind::EditPage => SiteToolCall::EditPage(parse_params(args)?),
            ToolKind::ReadPage => SiteToolCall::ReadPage(parse_params(args)?),
            ToolKind::ValidateSite => SiteToolCall::ValidateSite(parse_params(args)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            SiteToolCall::PlanSite(_) => ToolKind::PlanSite,
            SiteToolCall::WritePage(_) => ToolKind::WritePage,
            SiteToolCall::EditPage(_) => ToolKind::EditPage,
            SiteToolCall::ReadPage(_) => ToolKind::ReadPage,
            SiteToolCall::ValidateSite(_) => ToolKind::ValidateSite,
        }
    }
}

/// Run one parsed call against the session state.
pub fn execute(call: SiteToolCall, state: &mut GenerationState) -> ToolOutcome {
    match call {
        SiteToolCall::PlanSite(spec) => plan::execute(*spec, state),
        SiteToolCall::WritePage(params) => write_page::execute(params, state),
        SiteToolCall::EditPage(params) => edit_page::execute(params, state),
        SiteToolCall::ReadPage(params) => read_page::execute(params, state),
        SiteToolCall::ValidateSite(params) => validate_site::execute(params, state),
    }
}

/// Tool definitions in the shape the model API expects.
pub fn tool_definitions() -> Vec<AiTool> {
    ToolKind::ALL
        .into_iter()
        .map(|kind| AiTool {
            name: kind.name().to_string(),
            description: kind.description().to_string(),
            input_schema: kind.parameters_schema(),
        })
        .collect()
}

/// The five tools bound to one session's state.
///
/// Cloning shares the same state. Invocations are serialized by the state
/// lock, which is held only while a tool body runs.
#[derive(Clone, Default)]
pub struct SiteToolbox {
    state: Arc<Mutex<GenerationState>>,
}

impl SiteToolbox {
    pub fn new(state: GenerationState) -> Self {
        Self::from_shared(Arc::new(Mutex::new(state)))
    }

    pub fn from_shared(state: Arc<Mutex<GenerationState>>) -> Self {
        Self { state }
    }

    /// Shared handle to the underlying state.
    pub fn state(&self) -> Arc<Mutex<GenerationState>> {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> GenerationState {
        self.state.lock().clone()
    }

    pub fn definitions(&self) -> Vec<AiTool> {
        tool_definitions()
    }

    /// Parse and execute a call by wire name.
    pub fn invoke(&self, name: &str, args: Value) -> ToolOutcome {
        let start = Instant::now();
        let (tool, outcome) = match SiteToolCall::parse(name, args) {
            Ok(call) => {
                let kind = call.kind();
                let mut state = self.state.lock();
                (kind.name(), execute(call, &mut state))
            }
            Err(outcome) => (name, outcome),
        };

        tracing::info!(
            tool,
            duration_ms = start.elapsed().as_millis() as u64,
            is_error = outcome.is_error,
            "Tool executed"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::fixtures::{bakery_spec, valid_page};
    use serde_json::json;

    #[test]
    fn test_wire_names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("bash"), None);
    }

    #[test]
    fn test_definitions_cover_every_tool() {
        let defs = tool_definitions();
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["plan_site", "write_page", "edit_page", "read_page", "validate_site"]
        );
        for def in &defs {
            assert_eq!(def.input_schema["type"], "object");
            assert!(!def.description.is_empty());
        }
    }

    #[test]
    fn test_parsed_call_reports_its_kind() {
        let call = SiteToolCall::parse("read_page", json!({"filename": "index.html"})).unwrap();
        assert_eq!(call.kind(), ToolKind::ReadPage);

        let call = SiteToolCall::parse(
            "validate_site",
            json!({"pages": [], "overallQuality": "good", "summary": "ok"}),
        )
        .unwrap();
        assert_eq!(call.kind(), ToolKind::ValidateSite);
    }

    #[test]
    fn test_unknown_tool_is_error_without_mutation() {
        let toolbox = SiteToolbox::default();
        let outcome = toolbox.invoke("delete_site", json!({}));
        assert!(outcome.is_error);
        assert!(outcome.text.contains("Unknown tool: delete_site"));
        assert!(outcome.text.contains("write_page"));
        assert!(toolbox.snapshot().pages.is_empty());
    }

    #[test]
    fn test_malformed_params_are_invalid_parameters() {
        let toolbox = SiteToolbox::default();
        let outcome = toolbox.invoke("write_page", json!({ "filename": "index.html" }));
        assert!(outcome.is_error);
        assert!(outcome.text.starts_with("Invalid parameters:"));
        assert!(outcome.text.contains("html"));
        assert!(toolbox.snapshot().pages.is_empty());
    }

    #[test]
    fn test_toolbox_clones_share_state() {
        let toolbox = SiteToolbox::default();
        let other = toolbox.clone();

        let spec = serde_json::to_value(bakery_spec()).unwrap();
        assert!(!toolbox.invoke("plan_site", spec).is_error);
        let outcome = other.invoke(
            "write_page",
            json!({ "filename": "index.html", "html": valid_page("Home") }),
        );
        assert!(!outcome.is_error, "{}", outcome.text);

        let state = toolbox.snapshot();
        assert_eq!(state.spec, Some(bakery_spec()));
        assert!(state.pages.contains_key("index.html"));
    }

    #[test]
    fn test_separate_toolboxes_are_isolated() {
        let a = SiteToolbox::default();
        let b = SiteToolbox::default();
        a.invoke(
            "write_page",
            json!({ "filename": "index.html", "html": valid_page("A") }),
        );
        assert_eq!(a.snapshot().pages.len(), 1);
        assert!(b.snapshot().pages.is_empty());
    }
}
