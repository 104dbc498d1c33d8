//! edit_page - Apply an ordered batch of exact-match replacements to a page
//!
//! The batch runs against a working copy and is all-or-nothing. Once every
//! edit applies, the result is committed even if it no longer passes the
//! content validator; the issues are reported back instead.

use serde::Deserialize;
use serde_json::{json, Value};
use similar::TextDiff;

use crate::site::GenerationState;
use crate::tools::implementations::bullet_list;
use crate::tools::{PageDetails, ToolDetails, ToolOutcome};
use crate::validation::validate_html;

pub const DESCRIPTION: &str = "Apply search/replace edits to an existing page. Edits run in order against the page; each search string must match the current content exactly once (include surrounding text to make it unique). If any edit fails, none are applied. Use read_page first if unsure of the exact text.";

#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub filename: String,
    pub edits: Vec<EditOp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditOp {
    pub search: String,
    pub replace: String,
}

pub fn parameters_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "filename": {
                "type": "string",
                "description": "Page to edit, e.g. index.html"
            },
            "edits": {
                "type": "array",
                "description": "Edits to apply sequentially",
                "items": {
                    "type": "object",
                    "properties": {
                        "search": {
                            "type": "string",
                            "description": "Exact text to find; must occur exactly once"
                        },
                        "replace": {
                            "type": "string",
                            "description": "Replacement text"
                        }
                    },
                    "required": ["search", "replace"]
                },
                "minItems": 1
            }
        },
        "required": ["filename", "edits"],
        "additionalProperties": false
    })
}

pub fn execute(params: Params, state: &mut GenerationState) -> ToolOutcome {
    if params.edits.is_empty() {
        return ToolOutcome::invalid_parameters("At least one edit is required");
    }
    if let Some(index) = params.edits.iter().position(|e| e.search.is_empty()) {
        return ToolOutcome::invalid_parameters(format!(
            "Edit {} has an empty search string",
            index + 1
        ));
    }

    let Some(original) = state.pages.get(&params.filename) else {
        return ToolOutcome::error(format!(
            "Page not found: {}. Available pages: {}",
            params.filename,
            state.available_pages()
        ));
    };

    let mut content = original.clone();
    for (i, edit) in params.edits.iter().enumerate() {
        let count = count_occurrences(&content, &edit.search);
        if count != 1 {
            tracing::debug!(
                filename = %params.filename,
                edit = i + 1,
                matches = count,
                "Rejected page edit batch"
            );
            let reason = if count == 0 {
                "search string not found".to_string()
            } else {
                format!(
                    "search string found {} times; include more surrounding text to make it unique",
                    count
                )
            };
            return ToolOutcome::error(format!(
                "Edit {} of {} failed: {}. No edits were applied to {}.",
                i + 1,
                params.edits.len(),
                reason,
                params.filename
            ));
        }
        content = content.replacen(&edit.search, &edit.replace, 1);
    }

    let diff = generate_compact_diff(original, &content, &params.filename);
    let report = validate_html(&content);
    let valid = report.is_valid();
    let issues = (!valid).then(|| report.issues());

    state.pages.insert(params.filename.clone(), content.clone());

    let mut text = format!(
        "Applied {} edit(s) to {}.",
        params.edits.len(),
        params.filename
    );
    if let Some(issues) = &issues {
        text.push_str(&format!(
            " The page was saved but now has issues to fix:\n{}",
            bullet_list(issues)
        ));
    }
    if !diff.is_empty() {
        text.push_str("\n\n");
        text.push_str(&diff);
    }

    ToolOutcome::success_with(
        text,
        ToolDetails::Page(PageDetails {
            filename: params.filename,
            html: content,
            valid,
            issues,
        }),
    )
}

/// Start positions where `needle` occurs, overlapping ones included.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack
        .char_indices()
        .filter(|(i, _)| haystack[*i..].starts_with(needle))
        .count()
}

fn generate_compact_diff(old: &str, new: &str, filename: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut output = String::new();
    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        output.push_str(&format!("{}", hunk));
    }
    if output.is_empty() {
        return String::new();
    }
    format!("--- {}\n+++ {}\n{}", filename, filename, output)
}
