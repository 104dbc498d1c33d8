//! Tool implementations
//!
//! - plan_site: Commit the site plan
//! - write_page: Create/overwrite a page, rejected if it fails validation
//! - edit_page: Exact-match search/replace batch on an existing page
//! - read_page: Return a page's current html
//! - validate_site: Agent's self-review verdict

pub mod edit_page;
pub mod plan;
pub mod read_page;
pub mod validate_site;
pub mod write_page;

use crate::site::GenerationState;

/// Planned pages not yet written, in plan order.
pub(crate) fn remaining_planned_pages(state: &GenerationState) -> Vec<String> {
    state
        .spec
        .as_ref()
        .map(|spec| {
            spec.pages
                .iter()
                .filter(|p| !state.pages.contains_key(&p.filename))
                .map(|p| p.filename.clone())
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A page filename must be a bare `*.html` name.
pub(crate) fn check_filename(filename: &str) -> Result<(), String> {
    if filename.trim().is_empty() {
        return Err("filename must not be empty".to_string());
    }
    if filename.contains('/') || filename.contains('\\') || filename.starts_with('.') {
        return Err(format!(
            "filename must be a bare file name without directories: {}",
            filename
        ));
    }
    if !filename.to_ascii_lowercase().ends_with(".html") {
        return Err(format!("filename must end with .html: {}", filename));
    }
    Ok(())
}
