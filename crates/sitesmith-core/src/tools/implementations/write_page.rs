//! write_page - Create or overwrite a page, gated by the content validator

use serde::Deserialize;
use serde_json::{json, Value};

use crate::site::GenerationState;
use crate::tools::implementations::{bullet_list, check_filename, remaining_planned_pages};
use crate::tools::{PageDetails, ToolDetails, ToolOutcome};
use crate::validation::validate_html;

pub const DESCRIPTION: &str = "Write a complete HTML page (create or overwrite). The page must be a full document with <!DOCTYPE html>, <html>, <head>, <body>, the Tailwind CSS CDN script and the Alpine.js script. Images may only come from illustrations.popsy.co, data: URIs or root-relative paths. Pages failing these checks are rejected and not saved.";

#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub filename: String,
    pub html: String,
}

pub fn parameters_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "filename": {
                "type": "string",
                "description": "Bare file name from the plan, e.g. index.html"
            },
            "html": {
                "type": "string",
                "description": "The complete HTML document"
            }
        },
        "required": ["filename", "html"],
        "additionalProperties": false
    })
}

pub fn execute(params: Params, state: &mut GenerationState) -> ToolOutcome {
    if let Err(e) = check_filename(&params.filename) {
        return ToolOutcome::invalid_parameters(e);
    }

    let report = validate_html(&params.html);
    if !report.is_valid() {
        let issues = report.issues();
        tracing::debug!(
            filename = %params.filename,
            issues = issues.len(),
            "Rejected page write"
        );
        let text = format!(
            "Page {} was NOT saved. Fix these issues and call write_page again:\n{}",
            params.filename,
            bullet_list(&issues)
        );
        return ToolOutcome::error_with(
            text,
            ToolDetails::Page(PageDetails {
                filename: params.filename,
                html: params.html,
                valid: false,
                issues: Some(issues),
            }),
        );
    }

    let overwritten = state
        .pages
        .insert(params.filename.clone(), params.html.clone())
        .is_some();

    let mut text = format!(
        "{} {} ({} bytes).",
        if overwritten { "Overwrote" } else { "Saved" },
        params.filename,
        params.html.len()
    );
    let remaining = remaining_planned_pages(state);
    if remaining.is_empty() {
        text.push_str(" All planned pages are written.");
    } else {
        text.push_str(&format!(" Still to write: {}", remaining.join(", ")));
    }

    ToolOutcome::success_with(
        text,
        ToolDetails::Page(PageDetails {
            filename: params.filename,
            html: params.html,
            valid: true,
            issues: None,
        }),
    )
}
