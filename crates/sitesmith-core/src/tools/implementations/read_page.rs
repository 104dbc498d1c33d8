//! read_page - Return the committed html of a page

use serde::Deserialize;
use serde_json::{json, Value};

use crate::site::GenerationState;
use crate::tools::ToolOutcome;

pub const DESCRIPTION: &str =
    "Read the current HTML of a page you already wrote. Use before edit_page to copy exact search text.";

#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub filename: String,
}

pub fn parameters_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "filename": {
                "type": "string",
                "description": "Page to read, e.g. index.html"
            }
        },
        "required": ["filename"],
        "additionalProperties": false
    })
}

pub fn execute(params: Params, state: &mut GenerationState) -> ToolOutcome {
    match state.pages.get(&params.filename) {
        Some(html) => ToolOutcome::success(html.clone()),
        None => ToolOutcome::error(format!(
            "Page not found: {}. Available pages: {}",
            params.filename,
            state.available_pages()
        )),
    }
}
