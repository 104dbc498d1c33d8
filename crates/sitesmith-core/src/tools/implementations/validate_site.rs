//! validate_site - Record the agent's own review of the finished site
//!
//! The verdict is trusted as given; the content validator is not re-run here.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::site::GenerationState;
use crate::tools::implementations::bullet_list;
use crate::tools::{ToolDetails, ToolOutcome};

pub const DESCRIPTION: &str = "Call once every page is written. Review each page (structure, palette consistency, links between pages, image sources, responsiveness) and report issues honestly. If anything needs fixing, fix it with edit_page and call validate_site again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Excellent,
    Good,
    NeedsImprovement,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub pages: Vec<PageReview>,
    pub overall_quality: Quality,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageReview {
    pub filename: String,
    #[serde(default)]
    pub issues: Vec<String>,
}

pub fn parameters_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "pages": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "filename": { "type": "string" },
                        "issues": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Problems found on this page; empty if none"
                        }
                    },
                    "required": ["filename", "issues"]
                }
            },
            "overallQuality": {
                "type": "string",
                "enum": ["excellent", "good", "needs_improvement"]
            },
            "summary": { "type": "string" }
        },
        "required": ["pages", "overallQuality", "summary"],
        "additionalProperties": false
    })
}

pub fn execute(params: Params, state: &mut GenerationState) -> ToolOutcome {
    let issues: Vec<String> = params
        .pages
        .iter()
        .flat_map(|page| {
            page.issues
                .iter()
                .map(move |issue| format!("{}: {}", page.filename, issue))
        })
        .collect();

    let passed = issues.is_empty() && params.overall_quality != Quality::NeedsImprovement;
    state.validation_passed = passed;

    let details = ToolDetails::Validation {
        passed,
        issue_count: issues.len(),
    };

    if passed {
        return ToolOutcome::success_with(
            format!(
                "Validation passed for {} page(s). {}",
                params.pages.len(),
                params.summary
            )
            .trim_end()
            .to_string(),
            details,
        );
    }

    let mut text = String::from("Validation did not pass.");
    if issues.is_empty() {
        text.push_str(" Overall quality was rated needs_improvement.");
    } else {
        text.push_str(&format!(" Issues to fix:\n{}", bullet_list(&issues)));
    }
    text.push_str("\nFix them with edit_page, then call validate_site again.");
    ToolOutcome::success_with(text, details)
}
